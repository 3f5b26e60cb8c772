//! Public comment collectors for brand-sentiment scans.
//!
//! Each collector is best-effort: request failures are logged and yield fewer
//! comments rather than an error, so one broken platform never sinks a scan.

use std::time::Duration;

use crate::error::SentimentError;
use crate::types::SentimentSourceConfig;

pub mod reddit;
pub mod youtube;

pub use reddit::RedditSource;
pub use youtube::YouTubeSource;

fn build_client(config: &SentimentSourceConfig) -> Result<reqwest::Client, SentimentError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?)
}

async fn get_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
    context: &str,
) -> Result<T, SentimentError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SentimentError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| SentimentError::Deserialize {
        context: context.to_string(),
        source,
    })
}
