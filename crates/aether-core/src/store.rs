use async_trait::async_trait;
use thiserror::Error;

use crate::competitors::{Competitor, SocialAccount};
use crate::insights::{Insight, InsightFilter, NewInsight};
use crate::sentiment::{NewUserSentiment, UserSentiment};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("constraint violated: {0}")]
    Constraint(String),
}

/// Persistence seam for the scan and sentiment pipelines.
///
/// Every competitor read is scoped by owner: `get_competitor(id, owner)` returns
/// `None` for a competitor that exists but belongs to someone else.
#[async_trait]
pub trait ScanStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be queried.
    async fn get_competitor(
        &self,
        competitor_id: i64,
        owner_id: &str,
    ) -> Result<Option<Competitor>, StoreError>;

    /// Accounts for `competitor_id` with `is_active = true`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be queried.
    async fn list_active_social_accounts(
        &self,
        competitor_id: i64,
    ) -> Result<Vec<SocialAccount>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the row cannot be written.
    async fn insert_insight(&self, insight: NewInsight) -> Result<Insight, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be queried.
    async fn list_insights(
        &self,
        owner_id: &str,
        filter: &InsightFilter,
    ) -> Result<Vec<Insight>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the row cannot be written.
    async fn insert_user_sentiment(
        &self,
        row: NewUserSentiment,
    ) -> Result<UserSentiment, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError`] if the backing store cannot be queried.
    async fn latest_user_sentiment(
        &self,
        user_id: &str,
    ) -> Result<Option<UserSentiment>, StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the store does not respond.
    async fn health_check(&self) -> Result<(), StoreError>;
}
