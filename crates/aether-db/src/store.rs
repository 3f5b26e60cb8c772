//! [`ScanStore`] backed by Postgres.

use aether_core::{
    Competitor, Insight, InsightFilter, NewInsight, NewUserSentiment, ScanStore, SocialAccount,
    StoreError, UserSentiment,
};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_),
            ) => StoreError::Unavailable(err.to_string()),
            DbError::Sqlx(sqlx::Error::Database(ref db)) if db.constraint().is_some() => {
                StoreError::Constraint(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

#[async_trait]
impl ScanStore for PgStore {
    async fn get_competitor(
        &self,
        competitor_id: i64,
        owner_id: &str,
    ) -> Result<Option<Competitor>, StoreError> {
        Ok(crate::get_competitor_for_owner(&self.pool, competitor_id, owner_id).await?)
    }

    async fn list_active_social_accounts(
        &self,
        competitor_id: i64,
    ) -> Result<Vec<SocialAccount>, StoreError> {
        Ok(crate::list_active_social_accounts(&self.pool, competitor_id).await?)
    }

    async fn insert_insight(&self, insight: NewInsight) -> Result<Insight, StoreError> {
        Ok(crate::insert_insight(&self.pool, &insight).await?)
    }

    async fn list_insights(
        &self,
        owner_id: &str,
        filter: &InsightFilter,
    ) -> Result<Vec<Insight>, StoreError> {
        Ok(crate::list_insights(&self.pool, owner_id, filter).await?)
    }

    async fn insert_user_sentiment(
        &self,
        row: NewUserSentiment,
    ) -> Result<UserSentiment, StoreError> {
        Ok(crate::insert_user_sentiment(&self.pool, &row).await?)
    }

    async fn latest_user_sentiment(
        &self,
        user_id: &str,
    ) -> Result<Option<UserSentiment>, StoreError> {
        Ok(crate::get_latest_user_sentiment(&self.pool, user_id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
