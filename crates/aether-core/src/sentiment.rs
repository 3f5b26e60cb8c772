use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One piece of public commentary collected for a brand-sentiment scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    pub platform: String,
    pub text: String,
    pub author: Option<String>,
    pub timestamp: Option<String>,
    pub url: Option<String>,
}

/// Whole-number percentages that sum to 100 once repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: i32,
    pub neutral: i32,
    pub negative: i32,
}

impl SentimentBreakdown {
    #[must_use]
    pub fn total(&self) -> i32 {
        self.positive + self.neutral + self.negative
    }
}

/// Insert payload for one `user_sentiment_data` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserSentiment {
    pub user_id: String,
    pub breakdown: SentimentBreakdown,
    pub positive_summary: Vec<String>,
    pub neutral_summary: Vec<String>,
    pub negative_summary: Vec<String>,
    pub raw_comments: Vec<RawComment>,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSentiment {
    pub id: i64,
    pub user_id: String,
    pub scraped_at: DateTime<Utc>,
    pub positive_percentage: i32,
    pub neutral_percentage: i32,
    pub negative_percentage: i32,
    pub positive_summary: Vec<String>,
    pub neutral_summary: Vec<String>,
    pub negative_summary: Vec<String>,
    pub raw_comments: Vec<RawComment>,
    pub created_at: DateTime<Utc>,
}
