use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fold_label;

pub const DEFAULT_INSIGHT_LIMIT: i64 = 10;
pub const MAX_INSIGHT_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    ProductLaunch,
    FeatureUpdate,
    PricingChange,
    MarketingCampaign,
    ExecutiveHire,
    Partnership,
    Other,
}

impl InsightType {
    /// Case-insensitive; spaces and hyphens count as underscores, so
    /// `"Pricing Change"` resolves to [`InsightType::PricingChange`].
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "product_launch" => Some(Self::ProductLaunch),
            "feature_update" => Some(Self::FeatureUpdate),
            "pricing_change" => Some(Self::PricingChange),
            "marketing_campaign" => Some(Self::MarketingCampaign),
            "executive_hire" => Some(Self::ExecutiveHire),
            "partnership" => Some(Self::Partnership),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProductLaunch => "product_launch",
            Self::FeatureUpdate => "feature_update",
            Self::PricingChange => "pricing_change",
            Self::MarketingCampaign => "marketing_campaign",
            Self::ExecutiveHire => "executive_hire",
            Self::Partnership => "partnership",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Threat,
    Opportunity,
    Neutral,
}

impl Sentiment {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "threat" => Some(Self::Threat),
            "opportunity" => Some(Self::Opportunity),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Threat => "threat",
            Self::Opportunity => "opportunity",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match fold_label(raw).as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// A validated analysis result for one scraped document, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightDraft {
    pub platform: String,
    pub source_url: Option<String>,
    /// Source excerpt, at most [`crate::INSIGHT_EXCERPT_LIMIT`] characters.
    pub raw_content: String,
    pub summary: String,
    pub insight_type: InsightType,
    pub sentiment: Sentiment,
    pub priority: Priority,
    pub key_points: Vec<String>,
    pub recommendations: Vec<String>,
    pub impact: Option<String>,
    pub tags: Vec<String>,
    pub labels: Vec<String>,
    pub public_opinion_positive: i32,
    pub public_opinion_negative: i32,
}

/// Insert payload for one insight row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInsight {
    pub user_id: String,
    pub competitor_id: i64,
    pub draft: InsightDraft,
    pub detected_at: DateTime<Utc>,
}

/// A persisted insight as returned by the store and the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: i64,
    pub user_id: String,
    pub competitor_id: i64,
    pub platform: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub insight_type: InsightType,
    pub sentiment: Sentiment,
    pub priority: Priority,
    pub key_points: Vec<String>,
    pub recommendations: Vec<String>,
    pub tags: Vec<String>,
    pub labels: Vec<String>,
    pub impact: Option<String>,
    pub public_opinion_positive: i32,
    pub public_opinion_negative: i32,
    pub source_url: Option<String>,
    pub detected_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Read-side filter for listing a user's insights, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightFilter {
    pub competitor_id: Option<i64>,
    pub sentiment: Option<Sentiment>,
    pub priority: Option<Priority>,
    pub platform: Option<String>,
    pub insight_type: Option<InsightType>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for InsightFilter {
    fn default() -> Self {
        Self {
            competitor_id: None,
            sentiment: None,
            priority: None,
            platform: None,
            insight_type: None,
            limit: DEFAULT_INSIGHT_LIMIT,
            offset: 0,
        }
    }
}

impl InsightFilter {
    /// Limit clamped to `1..=MAX_INSIGHT_LIMIT`.
    #[must_use]
    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(1, MAX_INSIGHT_LIMIT)
    }

    #[must_use]
    pub fn effective_offset(&self) -> i64 {
        self.offset.max(0)
    }

    /// Whether `insight` passes every filter except owner, limit and offset.
    #[must_use]
    pub fn matches(&self, insight: &Insight) -> bool {
        self.competitor_id.is_none_or(|id| insight.competitor_id == id)
            && self.sentiment.is_none_or(|s| insight.sentiment == s)
            && self.priority.is_none_or(|p| insight.priority == p)
            && self.insight_type.is_none_or(|t| insight.insight_type == t)
            && self
                .platform
                .as_deref()
                .is_none_or(|p| insight.platform.as_deref() == Some(p))
    }
}
