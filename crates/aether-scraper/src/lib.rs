//! Content acquisition for competitor scans: fetch, normalize, and fan out
//! across a competitor's configured sources.

pub mod collect;
pub mod error;
pub mod fetch;
pub mod normalize;

pub use collect::{
    collect_documents, fetch_sources, plan_sources, CollectReport, SourceFailure, SourceOutcome,
    SourceSpec,
};
pub use error::ScraperError;
pub use fetch::{
    fetch_social, fetch_website, profile_url, FetchedPage, HttpFetcher, PageFetcher, SocialFetch,
};
pub use normalize::{normalize_text, truncate_chars};
