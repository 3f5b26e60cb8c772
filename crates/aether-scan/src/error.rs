use aether_analysis::AnalysisError;
use aether_core::StoreError;
use aether_scraper::ScraperError;
use aether_sentiment::SentimentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("competitor id must be a positive integer, got {0}")]
    InvalidCompetitorId(i64),

    #[error("competitor not found or access denied")]
    CompetitorAccessDenied,

    #[error("no data could be scraped from competitor sources")]
    NoDataScraped,

    #[error("at least one social media handle is required")]
    NoHandlesProvided,

    #[error("no comments found for the provided handles")]
    NoCommentsFound,

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("scraper error: {0}")]
    Scraper(ScraperError),

    #[error("sentiment source error: {0}")]
    Sentiment(SentimentError),
}

impl ScanError {
    /// Stable machine-readable code surfaced to API clients.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCompetitorId(_) => "INVALID_COMPETITOR_ID",
            Self::CompetitorAccessDenied => "COMPETITOR_ACCESS_DENIED",
            Self::NoDataScraped => "NO_DATA_SCRAPED",
            Self::NoHandlesProvided => "NO_HANDLES_PROVIDED",
            Self::NoCommentsFound => "NO_COMMENTS_FOUND",
            Self::Analysis(_) => "ANALYSIS_FAILED",
            Self::Store(_) | Self::Scraper(_) | Self::Sentiment(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ScraperError> for ScanError {
    fn from(e: ScraperError) -> Self {
        match e {
            ScraperError::NoDataScraped => Self::NoDataScraped,
            other => Self::Scraper(other),
        }
    }
}

impl From<SentimentError> for ScanError {
    fn from(e: SentimentError) -> Self {
        match e {
            SentimentError::NoHandlesProvided => Self::NoHandlesProvided,
            SentimentError::NoCommentsFound => Self::NoCommentsFound,
            SentimentError::Analysis(inner) => Self::Analysis(inner),
            other => Self::Sentiment(other),
        }
    }
}
