//! Shared domain types, configuration, and the persistence seam for Aether.

pub mod app_config;
pub mod competitors;
pub mod config;
pub mod documents;
pub mod insights;
pub mod sentiment;
pub mod store;

#[cfg(any(test, feature = "memory-store"))]
pub mod memory;

pub use app_config::{AppConfig, Environment};
pub use competitors::{Competitor, MonitoringFrequency, MonitoringStatus, Platform, SocialAccount};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use documents::{
    ScrapedDocument, INSIGHT_EXCERPT_LIMIT, SOCIAL_CONTENT_LIMIT, WEBSITE_CONTENT_LIMIT,
    WEBSITE_PLATFORM,
};
pub use insights::{
    Insight, InsightDraft, InsightFilter, InsightType, NewInsight, Priority, Sentiment,
    DEFAULT_INSIGHT_LIMIT, MAX_INSIGHT_LIMIT,
};
pub use sentiment::{NewUserSentiment, RawComment, SentimentBreakdown, UserSentiment};
pub use store::{ScanStore, StoreError};

#[cfg(any(test, feature = "memory-store"))]
pub use memory::MemoryStore;

/// Normalizes a free-form enum label for comparison: lowercase, trimmed, with
/// spaces and hyphens folded to underscores.
pub(crate) fn fold_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
