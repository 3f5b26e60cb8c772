//! Brand-sentiment pipeline orchestration.

use std::sync::Arc;

use aether_analysis::{analyze_sentiment, AnalysisService};
use aether_core::RawComment;
use chrono::Utc;

use crate::error::SentimentError;
use crate::sources::{RedditSource, YouTubeSource};
use crate::types::{SentimentSourceConfig, SocialHandles, UserSentimentReport};

/// Everything a sentiment scan talks to.
pub struct SentimentDeps {
    pub youtube: YouTubeSource,
    pub reddit: RedditSource,
    pub analysis: Arc<dyn AnalysisService>,
}

impl SentimentDeps {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if an HTTP client cannot be built.
    pub fn new(
        config: &SentimentSourceConfig,
        analysis: Arc<dyn AnalysisService>,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            youtube: YouTubeSource::new(config)?,
            reddit: RedditSource::new(config)?,
            analysis,
        })
    }
}

/// Collects comments for every requested platform, YouTube first.
///
/// Twitter handles are accepted but have no collector, so they contribute
/// nothing.
pub async fn collect_comments(deps: &SentimentDeps, handles: &SocialHandles) -> Vec<RawComment> {
    let mut comments = Vec::new();

    if let Some(channel) = handles.youtube() {
        comments.extend(deps.youtube.collect(channel).await);
    }
    if let Some(handle) = handles.reddit() {
        comments.extend(deps.reddit.collect(handle).await);
    }
    if let Some(handle) = handles.twitter() {
        tracing::info!(handle, "twitter comments are not collected");
    }

    comments
}

/// Runs one brand-sentiment scan for the caller's own handles.
///
/// 1. Reject a request with no usable handle.
/// 2. Collect comments per platform (best-effort).
/// 3. Fail when nothing was collected.
/// 4. Ask the analysis service for a repaired breakdown and summaries.
///
/// Persisting the report is the caller's job.
///
/// # Errors
///
/// - [`SentimentError::NoHandlesProvided`] when every handle is blank.
/// - [`SentimentError::NoCommentsFound`] when no platform yielded a comment.
/// - [`SentimentError::Analysis`] when the analysis service fails or answers
///   without a usable breakdown.
pub async fn run_user_sentiment(
    deps: &SentimentDeps,
    handles: &SocialHandles,
) -> Result<UserSentimentReport, SentimentError> {
    if handles.is_empty() {
        return Err(SentimentError::NoHandlesProvided);
    }

    let comments = collect_comments(deps, handles).await;
    if comments.is_empty() {
        return Err(SentimentError::NoCommentsFound);
    }

    tracing::info!(comments = comments.len(), "analyzing brand sentiment");
    let analysis = analyze_sentiment(deps.analysis.as_ref(), &comments).await?;

    Ok(UserSentimentReport {
        analysis,
        comments,
        platforms: handles.platform_names(),
        scraped_at: Utc::now(),
    })
}
