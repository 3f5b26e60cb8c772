use serde::{Deserialize, Serialize};

/// Character cap for text pulled from a competitor website.
pub const WEBSITE_CONTENT_LIMIT: usize = 5000;
/// Character cap for text pulled from a social profile page.
pub const SOCIAL_CONTENT_LIMIT: usize = 3000;
/// Character cap for the raw excerpt stored on an insight.
pub const INSIGHT_EXCERPT_LIMIT: usize = 1000;

/// Platform tag used for documents fetched from the competitor's website.
pub const WEBSITE_PLATFORM: &str = "website";

/// Bounded plain text collected from one source during a scan.
///
/// Produced fresh per scan and discarded once analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedDocument {
    pub platform: String,
    pub url: String,
    pub content: String,
}
