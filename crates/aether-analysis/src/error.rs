use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analysis service returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("analysis service is not configured: {0} is unset")]
    MissingApiKey(&'static str),

    #[error("analysis service returned no text")]
    EmptyResponse,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("analysis response could not be interpreted: {0}")]
    InvalidResponse(String),
}
