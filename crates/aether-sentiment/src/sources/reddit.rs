//! Reddit public-listing collector.
//!
//! A subreddit identifier (`r/name`, `/r/name`, or a reddit.com subreddit
//! URL) reads the subreddit's newest posts. Anything else is treated as a
//! site-wide search term.

use aether_core::RawComment;
use chrono::DateTime;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use super::{build_client, get_json};
use crate::error::SentimentError;
use crate::types::SentimentSourceConfig;

pub const MAX_REDDIT_POSTS: usize = 100;

const PLATFORM: &str = "reddit";
const PERMALINK_HOST: &str = "https://www.reddit.com";

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    selftext: Option<String>,
    author: Option<String>,
    permalink: Option<String>,
    created_utc: Option<f64>,
}

/// What a reddit handle resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedditTarget {
    Subreddit(String),
    Search(String),
}

impl RedditTarget {
    #[must_use]
    pub fn parse(handle: &str) -> Self {
        let trimmed = handle.trim();
        let path = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .map_or(trimmed, |rest| {
                rest.split_once('/').map_or("", |(_, path)| path)
            });
        let path = path.trim_start_matches('/');

        if let Some(name) = path.strip_prefix("r/") {
            let name = name.split('/').next().unwrap_or_default().trim();
            if !name.is_empty() {
                return Self::Subreddit(name.to_string());
            }
        }
        Self::Search(trimmed.to_string())
    }
}

#[derive(Debug)]
pub struct RedditSource {
    client: reqwest::Client,
    base_url: String,
}

impl RedditSource {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SentimentSourceConfig) -> Result<Self, SentimentError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.reddit_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Collects up to [`MAX_REDDIT_POSTS`] posts for `handle`. Failures are
    /// logged and produce an empty list.
    pub async fn collect(&self, handle: &str) -> Vec<RawComment> {
        let target = RedditTarget::parse(handle);
        match self.fetch(&target).await {
            Ok(posts) => {
                tracing::debug!(handle, posts = posts.len(), "reddit posts collected");
                posts
            }
            Err(e) => {
                tracing::warn!(handle, error = %e, "reddit fetch failed");
                Vec::new()
            }
        }
    }

    async fn fetch(&self, target: &RedditTarget) -> Result<Vec<RawComment>, SentimentError> {
        let limit = MAX_REDDIT_POSTS.to_string();
        let request = match target {
            RedditTarget::Subreddit(name) => {
                let encoded = utf8_percent_encode(name, NON_ALPHANUMERIC);
                self.client
                    .get(format!("{}/r/{encoded}/new.json", self.base_url))
                    .query(&[("limit", limit.as_str())])
            }
            RedditTarget::Search(term) => self
                .client
                .get(format!("{}/search.json", self.base_url))
                .query(&[("q", term.as_str()), ("sort", "new"), ("limit", limit.as_str())]),
        };
        let listing: Listing = get_json(request, "reddit listing").await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .filter_map(|post| to_comment(post.data))
            .take(MAX_REDDIT_POSTS)
            .collect())
    }
}

fn to_comment(post: PostData) -> Option<RawComment> {
    let text = post
        .selftext
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            post.title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        })?;

    #[allow(clippy::cast_possible_truncation)]
    let timestamp = post
        .created_utc
        .filter(|secs| secs.is_finite())
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
        .map(|dt| dt.to_rfc3339());

    Some(RawComment {
        platform: PLATFORM.to_string(),
        text,
        author: post.author,
        timestamp,
        url: post.permalink.map(|p| format!("{PERMALINK_HOST}{p}")),
    })
}
