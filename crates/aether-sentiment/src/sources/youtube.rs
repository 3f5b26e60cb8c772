//! YouTube Data API v3 comment collector.
//!
//! Searches for the channel's most recent videos, then pulls top-level
//! comment threads per video until the overall cap is reached.

use aether_core::RawComment;
use serde::Deserialize;

use super::{build_client, get_json};
use crate::error::SentimentError;
use crate::types::SentimentSourceConfig;

pub const MAX_VIDEOS: usize = 10;
pub const MAX_COMMENTS_PER_VIDEO: usize = 50;
pub const MAX_YOUTUBE_COMMENTS: usize = 500;

const PLATFORM: &str = "youtube";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentThreadsResponse {
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentThreadSnippet {
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_display: Option<String>,
    text_original: Option<String>,
    author_display_name: Option<String>,
    published_at: Option<String>,
}

pub struct YouTubeSource {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for YouTubeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeSource")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl YouTubeSource {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SentimentSourceConfig) -> Result<Self, SentimentError> {
        Ok(Self {
            client: build_client(config)?,
            api_key: config.youtube_api_key.clone(),
            base_url: config.youtube_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Collects up to [`MAX_YOUTUBE_COMMENTS`] comments from the channel's
    /// latest videos. Without an API key nothing is collected.
    pub async fn collect(&self, channel: &str) -> Vec<RawComment> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::info!(channel, "YOUTUBE_API_KEY not set; skipping youtube comments");
            return Vec::new();
        };

        let video_ids = match self.search_videos(api_key, channel).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(channel, error = %e, "youtube video search failed");
                return Vec::new();
            }
        };

        let mut comments = Vec::new();
        for video_id in &video_ids {
            if comments.len() >= MAX_YOUTUBE_COMMENTS {
                break;
            }
            match self.video_comments(api_key, video_id).await {
                Ok(batch) => {
                    let room = MAX_YOUTUBE_COMMENTS - comments.len();
                    comments.extend(batch.into_iter().take(room));
                }
                Err(e) => {
                    tracing::warn!(video_id = %video_id, error = %e, "youtube comment fetch failed");
                }
            }
        }

        tracing::debug!(
            channel,
            videos = video_ids.len(),
            comments = comments.len(),
            "youtube comments collected"
        );
        comments
    }

    async fn search_videos(
        &self,
        api_key: &str,
        channel: &str,
    ) -> Result<Vec<String>, SentimentError> {
        let max_results = MAX_VIDEOS.to_string();
        let request = self
            .client
            .get(format!("{}/youtube/v3/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("order", "date"),
                ("q", channel),
                ("maxResults", max_results.as_str()),
                ("key", api_key),
            ]);
        let response: SearchResponse = get_json(request, "youtube search response").await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .filter(|id| !id.is_empty())
            .take(MAX_VIDEOS)
            .collect())
    }

    async fn video_comments(
        &self,
        api_key: &str,
        video_id: &str,
    ) -> Result<Vec<RawComment>, SentimentError> {
        let max_results = MAX_COMMENTS_PER_VIDEO.to_string();
        let request = self
            .client
            .get(format!("{}/youtube/v3/commentThreads", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("videoId", video_id),
                ("textFormat", "plainText"),
                ("maxResults", max_results.as_str()),
                ("key", api_key),
            ]);
        let response: CommentThreadsResponse =
            get_json(request, "youtube commentThreads response").await?;

        let url = format!("https://youtube.com/watch?v={video_id}");
        Ok(response
            .items
            .into_iter()
            .filter_map(|thread| {
                let snippet = thread.snippet.top_level_comment.snippet;
                let text = snippet
                    .text_original
                    .or(snippet.text_display)
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())?;
                Some(RawComment {
                    platform: PLATFORM.to_string(),
                    text,
                    author: snippet.author_display_name,
                    timestamp: snippet.published_at,
                    url: Some(url.clone()),
                })
            })
            .take(MAX_COMMENTS_PER_VIDEO)
            .collect())
    }
}
