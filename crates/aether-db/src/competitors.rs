//! Database operations for the `competitors` and `social_accounts` tables.

use aether_core::{Competitor, MonitoringFrequency, MonitoringStatus, Platform, SocialAccount};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `competitors` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompetitorRow {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
    pub industry: Option<String>,
    pub status: String,
    pub monitoring_frequency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CompetitorRow> for Competitor {
    type Error = DbError;

    fn try_from(row: CompetitorRow) -> Result<Self, Self::Error> {
        let status =
            MonitoringStatus::parse(&row.status).ok_or_else(|| DbError::InvalidColumn {
                column: "status",
                value: row.status.clone(),
            })?;
        let monitoring_frequency = MonitoringFrequency::parse(&row.monitoring_frequency)
            .ok_or_else(|| DbError::InvalidColumn {
                column: "monitoring_frequency",
                value: row.monitoring_frequency.clone(),
            })?;
        Ok(Competitor {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            website_url: row.website_url,
            logo_url: row.logo_url,
            industry: row.industry,
            status,
            monitoring_frequency,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `social_accounts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SocialAccountRow {
    pub id: i64,
    pub competitor_id: i64,
    pub platform: String,
    pub handle: String,
    pub url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SocialAccountRow> for SocialAccount {
    fn from(row: SocialAccountRow) -> Self {
        SocialAccount {
            id: row.id,
            competitor_id: row.competitor_id,
            platform: row.platform,
            handle: row.handle,
            url: row.url,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCompetitor<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
    pub website_url: Option<&'a str>,
    pub industry: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct NewSocialAccount<'a> {
    pub competitor_id: i64,
    pub platform: &'a str,
    pub handle: &'a str,
    pub url: Option<&'a str>,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the competitor with `competitor_id` only when it belongs to `owner_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidColumn`]
/// if a stored enum column holds an unknown value.
pub async fn get_competitor_for_owner(
    pool: &PgPool,
    competitor_id: i64,
    owner_id: &str,
) -> Result<Option<Competitor>, DbError> {
    let row = sqlx::query_as::<_, CompetitorRow>(
        "SELECT id, user_id, name, website_url, logo_url, industry, status, \
                monitoring_frequency, created_at, updated_at \
         FROM competitors \
         WHERE id = $1 AND user_id = $2",
    )
    .bind(competitor_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    row.map(Competitor::try_from).transpose()
}

/// Returns active social accounts for a competitor, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_social_accounts(
    pool: &PgPool,
    competitor_id: i64,
) -> Result<Vec<SocialAccount>, DbError> {
    let rows = sqlx::query_as::<_, SocialAccountRow>(
        "SELECT id, competitor_id, platform, handle, url, is_active, created_at \
         FROM social_accounts \
         WHERE competitor_id = $1 AND is_active = true \
         ORDER BY id",
    )
    .bind(competitor_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SocialAccount::from).collect())
}

/// Insert a competitor with default status and monitoring frequency.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_competitor(
    pool: &PgPool,
    competitor: &NewCompetitor<'_>,
) -> Result<Competitor, DbError> {
    let row = sqlx::query_as::<_, CompetitorRow>(
        "INSERT INTO competitors (user_id, name, website_url, industry) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, user_id, name, website_url, logo_url, industry, status, \
                   monitoring_frequency, created_at, updated_at",
    )
    .bind(competitor.user_id)
    .bind(competitor.name.trim())
    .bind(competitor.website_url)
    .bind(competitor.industry)
    .fetch_one(pool)
    .await?;

    Competitor::try_from(row)
}

/// Insert a social account. The platform is resolved through [`Platform::parse`]
/// and stored in its canonical lower-case form; the handle is trimmed.
///
/// # Errors
///
/// Returns [`DbError::InvalidPlatform`] for an unsupported platform, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_social_account(
    pool: &PgPool,
    account: &NewSocialAccount<'_>,
) -> Result<SocialAccount, DbError> {
    let platform = Platform::parse(account.platform)
        .ok_or_else(|| DbError::InvalidPlatform(account.platform.to_string()))?;

    let row = sqlx::query_as::<_, SocialAccountRow>(
        "INSERT INTO social_accounts (competitor_id, platform, handle, url, is_active) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, competitor_id, platform, handle, url, is_active, created_at",
    )
    .bind(account.competitor_id)
    .bind(platform.as_str())
    .bind(account.handle.trim())
    .bind(account.url)
    .bind(account.is_active)
    .fetch_one(pool)
    .await?;

    Ok(SocialAccount::from(row))
}
