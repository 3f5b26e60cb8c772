use aether_analysis::SentimentAnalysis;
use aether_core::{AppConfig, NewUserSentiment, RawComment};
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// The user's own channels to sample. Blank handles count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SocialHandles {
    pub youtube: Option<String>,
    pub reddit: Option<String>,
    pub twitter: Option<String>,
}

impl SocialHandles {
    fn present(value: Option<&String>) -> Option<&str> {
        value.map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn youtube(&self) -> Option<&str> {
        Self::present(self.youtube.as_ref())
    }

    #[must_use]
    pub fn reddit(&self) -> Option<&str> {
        Self::present(self.reddit.as_ref())
    }

    #[must_use]
    pub fn twitter(&self) -> Option<&str> {
        Self::present(self.twitter.as_ref())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.youtube().is_none() && self.reddit().is_none() && self.twitter().is_none()
    }

    /// Display names of the requested platforms, in collection order.
    #[must_use]
    pub fn platform_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.youtube().is_some() {
            names.push("YouTube");
        }
        if self.reddit().is_some() {
            names.push("Reddit");
        }
        if self.twitter().is_some() {
            names.push("Twitter");
        }
        names
    }
}

/// Endpoints and credentials for the comment sources.
#[derive(Debug, Clone)]
pub struct SentimentSourceConfig {
    pub youtube_api_key: Option<String>,
    pub youtube_base_url: String,
    pub reddit_base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl SentimentSourceConfig {
    #[must_use]
    pub fn new(youtube_api_key: Option<String>, user_agent: &str, timeout_secs: u64) -> Self {
        Self {
            youtube_api_key,
            youtube_base_url: DEFAULT_YOUTUBE_BASE_URL.to_string(),
            reddit_base_url: DEFAULT_REDDIT_BASE_URL.to_string(),
            user_agent: user_agent.to_string(),
            timeout_secs,
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(
            config.youtube_api_key.clone(),
            &config.scraper_user_agent,
            config.scraper_request_timeout_secs,
        )
    }
}

/// Outcome of one brand-sentiment scan, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSentimentReport {
    pub analysis: SentimentAnalysis,
    pub comments: Vec<RawComment>,
    pub platforms: Vec<&'static str>,
    pub scraped_at: DateTime<Utc>,
}

impl UserSentimentReport {
    #[must_use]
    pub fn into_new_row(self, user_id: &str) -> NewUserSentiment {
        NewUserSentiment {
            user_id: user_id.to_string(),
            breakdown: self.analysis.breakdown,
            positive_summary: self.analysis.positive_summary,
            neutral_summary: self.analysis.neutral_summary,
            negative_summary: self.analysis.negative_summary,
            raw_comments: self.comments,
            scraped_at: self.scraped_at,
        }
    }
}
