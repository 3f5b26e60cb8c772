//! Single-source fetchers for competitor websites and social profile pages.

use std::time::Duration;

use aether_core::{Platform, SOCIAL_CONTENT_LIMIT, WEBSITE_CONTENT_LIMIT};
use async_trait::async_trait;
use reqwest::Client;

use crate::error::ScraperError;
use crate::normalize::normalize_text;

/// Status code and body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The outbound HTTP capability used by every fetcher.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] on connection failures and timeouts.
    /// Non-2xx responses are returned as a [`FetchedPage`], not an error.
    async fn get(&self, url: &str) -> Result<FetchedPage, ScraperError>;
}

/// [`PageFetcher`] over a shared `reqwest::Client` with a fixed timeout and
/// descriptive `User-Agent`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }
}

/// Result of fetching one social profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialFetch {
    /// The URL actually requested.
    pub url: String,
    pub content: String,
}

/// Canonical public profile URL for `handle` on `platform`. A handle that
/// already starts with `http` is returned unchanged.
#[must_use]
pub fn profile_url(platform: Platform, handle: &str) -> String {
    let handle = handle.trim();
    if handle.starts_with("http") {
        return handle.to_string();
    }
    match platform {
        Platform::LinkedIn => format!("https://www.linkedin.com/company/{handle}"),
        Platform::Twitter => format!("https://twitter.com/{handle}"),
        Platform::Facebook => format!("https://www.facebook.com/{handle}"),
        Platform::Instagram => format!("https://www.instagram.com/{handle}"),
        Platform::Reddit => format!("https://www.reddit.com/user/{handle}"),
        Platform::Bluesky => format!("https://bsky.app/profile/{handle}"),
        Platform::TruthSocial => format!("https://truthsocial.com/@{handle}"),
    }
}

/// Fetches a competitor website and returns its normalized text, capped at
/// [`WEBSITE_CONTENT_LIMIT`] characters.
///
/// # Errors
///
/// Returns [`ScraperError::Http`] on network failure or timeout,
/// [`ScraperError::UnexpectedStatus`] on a non-2xx response, and
/// [`ScraperError::EmptyContent`] when no text survives normalization.
pub async fn fetch_website(fetcher: &dyn PageFetcher, url: &str) -> Result<String, ScraperError> {
    fetch_normalized(fetcher, url, WEBSITE_CONTENT_LIMIT).await
}

/// Fetches a social profile page and returns its normalized text, capped at
/// [`SOCIAL_CONTENT_LIMIT`] characters.
///
/// `platform` is resolved with [`Platform::parse`]; an unknown platform fails
/// before any request is made.
///
/// # Errors
///
/// Returns [`ScraperError::UnsupportedPlatform`] for an unknown platform, and
/// otherwise the same errors as [`fetch_website`].
pub async fn fetch_social(
    fetcher: &dyn PageFetcher,
    platform: &str,
    handle_or_url: &str,
) -> Result<SocialFetch, ScraperError> {
    let resolved = Platform::parse(platform)
        .ok_or_else(|| ScraperError::UnsupportedPlatform(platform.to_string()))?;
    let url = profile_url(resolved, handle_or_url);
    let content = fetch_normalized(fetcher, &url, SOCIAL_CONTENT_LIMIT).await?;
    Ok(SocialFetch { url, content })
}

async fn fetch_normalized(
    fetcher: &dyn PageFetcher,
    url: &str,
    max_chars: usize,
) -> Result<String, ScraperError> {
    let page = fetcher.get(url).await?;
    if !page.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: page.status,
            url: url.to_string(),
        });
    }
    let text = normalize_text(&page.body, max_chars);
    if text.is_empty() {
        return Err(ScraperError::EmptyContent {
            url: url.to_string(),
        });
    }
    Ok(text)
}
