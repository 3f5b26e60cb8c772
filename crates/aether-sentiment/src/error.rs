use aether_analysis::AnalysisError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("at least one social media handle is required")]
    NoHandlesProvided,

    #[error("no comments found for the provided handles")]
    NoCommentsFound,

    #[error("sentiment analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}
