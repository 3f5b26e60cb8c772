//! In-memory [`ScanStore`] for tests and local dry runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::competitors::{Competitor, MonitoringFrequency, MonitoringStatus, SocialAccount};
use crate::insights::{Insight, InsightFilter, NewInsight};
use crate::sentiment::{NewUserSentiment, UserSentiment};
use crate::store::{ScanStore, StoreError};

#[derive(Default)]
struct Tables {
    competitors: Vec<Competitor>,
    social_accounts: Vec<SocialAccount>,
    insights: Vec<Insight>,
    user_sentiment: Vec<UserSentiment>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_inserts: AtomicBool,
    unavailable: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Seeds an active, daily-monitored competitor and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is marked unavailable.
    pub fn add_competitor(
        &self,
        owner_id: &str,
        name: &str,
        website_url: Option<&str>,
    ) -> Result<Competitor, StoreError> {
        let mut tables = self.lock()?;
        let now = Utc::now();
        let competitor = Competitor {
            id: tables.next_id(),
            user_id: owner_id.to_string(),
            name: name.to_string(),
            website_url: website_url.map(str::to_string),
            logo_url: None,
            industry: None,
            status: MonitoringStatus::Active,
            monitoring_frequency: MonitoringFrequency::Daily,
            created_at: now,
            updated_at: now,
        };
        tables.competitors.push(competitor.clone());
        Ok(competitor)
    }

    /// Seeds a social account. The platform is stored lower-cased and trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store is marked unavailable.
    pub fn add_social_account(
        &self,
        competitor_id: i64,
        platform: &str,
        handle: &str,
        url: Option<&str>,
        is_active: bool,
    ) -> Result<SocialAccount, StoreError> {
        let mut tables = self.lock()?;
        let account = SocialAccount {
            id: tables.next_id(),
            competitor_id,
            platform: platform.trim().to_lowercase(),
            handle: handle.trim().to_string(),
            url: url.map(str::to_string),
            is_active,
            created_at: Utc::now(),
        };
        tables.social_accounts.push(account.clone());
        Ok(account)
    }

    /// Makes every subsequent insert fail with [`StoreError::Query`].
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    #[must_use]
    pub fn insight_count(&self) -> usize {
        self.tables.lock().map_or(0, |t| t.insights.len())
    }

    #[must_use]
    pub fn user_sentiment_count(&self) -> usize {
        self.tables.lock().map_or(0, |t| t.user_sentiment.len())
    }

    fn check_insert(&self) -> Result<(), StoreError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Query("insert rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ScanStore for MemoryStore {
    async fn get_competitor(
        &self,
        competitor_id: i64,
        owner_id: &str,
    ) -> Result<Option<Competitor>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .competitors
            .iter()
            .find(|c| c.id == competitor_id && c.user_id == owner_id)
            .cloned())
    }

    async fn list_active_social_accounts(
        &self,
        competitor_id: i64,
    ) -> Result<Vec<SocialAccount>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .social_accounts
            .iter()
            .filter(|a| a.competitor_id == competitor_id && a.is_active)
            .cloned()
            .collect())
    }

    async fn insert_insight(&self, insight: NewInsight) -> Result<Insight, StoreError> {
        self.check_insert()?;
        let mut tables = self.lock()?;
        let NewInsight {
            user_id,
            competitor_id,
            draft,
            detected_at,
        } = insight;
        let row = Insight {
            id: tables.next_id(),
            user_id,
            competitor_id,
            platform: Some(draft.platform),
            content: Some(draft.raw_content),
            summary: Some(draft.summary),
            insight_type: draft.insight_type,
            sentiment: draft.sentiment,
            priority: draft.priority,
            key_points: draft.key_points,
            recommendations: draft.recommendations,
            tags: draft.tags,
            labels: draft.labels,
            impact: draft.impact,
            public_opinion_positive: draft.public_opinion_positive,
            public_opinion_negative: draft.public_opinion_negative,
            source_url: draft.source_url,
            detected_at,
            created_at: detected_at,
        };
        tables.insights.push(row.clone());
        Ok(row)
    }

    async fn list_insights(
        &self,
        owner_id: &str,
        filter: &InsightFilter,
    ) -> Result<Vec<Insight>, StoreError> {
        let tables = self.lock()?;
        let mut rows: Vec<Insight> = tables
            .insights
            .iter()
            .filter(|i| i.user_id == owner_id && filter.matches(i))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.detected_at.cmp(&a.detected_at).then(b.id.cmp(&a.id)));
        let offset = usize::try_from(filter.effective_offset()).unwrap_or(0);
        let limit = usize::try_from(filter.effective_limit()).unwrap_or(0);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn insert_user_sentiment(
        &self,
        row: NewUserSentiment,
    ) -> Result<UserSentiment, StoreError> {
        self.check_insert()?;
        let mut tables = self.lock()?;
        let stored = UserSentiment {
            id: tables.next_id(),
            user_id: row.user_id,
            scraped_at: row.scraped_at,
            positive_percentage: row.breakdown.positive,
            neutral_percentage: row.breakdown.neutral,
            negative_percentage: row.breakdown.negative,
            positive_summary: row.positive_summary,
            neutral_summary: row.neutral_summary,
            negative_summary: row.negative_summary,
            raw_comments: row.raw_comments,
            created_at: Utc::now(),
        };
        tables.user_sentiment.push(stored.clone());
        Ok(stored)
    }

    async fn latest_user_sentiment(
        &self,
        user_id: &str,
    ) -> Result<Option<UserSentiment>, StoreError> {
        let tables = self.lock()?;
        Ok(tables
            .user_sentiment
            .iter()
            .filter(|r| r.user_id == user_id)
            .max_by(|a, b| a.scraped_at.cmp(&b.scraped_at).then(a.id.cmp(&b.id)))
            .cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}
