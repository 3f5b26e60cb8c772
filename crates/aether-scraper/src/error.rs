use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no readable text at {url}")]
    EmptyContent { url: String },

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("no content could be scraped from any source")]
    NoDataScraped,
}
