//! Brand-sentiment pipeline for a user's own channels.
//!
//! Collects public comments from YouTube (Data API v3) and Reddit (public JSON
//! listings), asks the analysis service for a positive/neutral/negative
//! breakdown, and returns a report ready to persist as one
//! `user_sentiment_data` row.

pub mod error;
pub mod pipeline;
pub mod sources;
pub mod types;

pub use error::SentimentError;
pub use pipeline::{collect_comments, run_user_sentiment, SentimentDeps};
pub use sources::{RedditSource, YouTubeSource};
pub use types::{SentimentSourceConfig, SocialHandles, UserSentimentReport};
