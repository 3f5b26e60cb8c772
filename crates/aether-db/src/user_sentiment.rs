//! Database operations for the `user_sentiment_data` table.

use aether_core::{NewUserSentiment, RawComment, UserSentiment};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `user_sentiment_data` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSentimentRow {
    pub id: i64,
    pub user_id: String,
    pub scraped_at: DateTime<Utc>,
    pub positive_percentage: i32,
    pub neutral_percentage: i32,
    pub negative_percentage: i32,
    pub positive_summary: Json<Vec<String>>,
    pub neutral_summary: Json<Vec<String>>,
    pub negative_summary: Json<Vec<String>>,
    pub raw_comments: Json<Vec<RawComment>>,
    pub created_at: DateTime<Utc>,
}

impl From<UserSentimentRow> for UserSentiment {
    fn from(row: UserSentimentRow) -> Self {
        UserSentiment {
            id: row.id,
            user_id: row.user_id,
            scraped_at: row.scraped_at,
            positive_percentage: row.positive_percentage,
            neutral_percentage: row.neutral_percentage,
            negative_percentage: row.negative_percentage,
            positive_summary: row.positive_summary.0,
            neutral_summary: row.neutral_summary.0,
            negative_summary: row.negative_summary.0,
            raw_comments: row.raw_comments.0,
            created_at: row.created_at,
        }
    }
}

/// Append one sentiment scan result. History is retained; nothing is replaced.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including the sum-to-100 CHECK).
pub async fn insert_user_sentiment(
    pool: &PgPool,
    row: &NewUserSentiment,
) -> Result<UserSentiment, DbError> {
    let stored = sqlx::query_as::<_, UserSentimentRow>(
        "INSERT INTO user_sentiment_data \
             (user_id, scraped_at, positive_percentage, neutral_percentage, negative_percentage, \
              positive_summary, neutral_summary, negative_summary, raw_comments) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING id, user_id, scraped_at, positive_percentage, neutral_percentage, \
                   negative_percentage, positive_summary, neutral_summary, negative_summary, \
                   raw_comments, created_at",
    )
    .bind(&row.user_id)
    .bind(row.scraped_at)
    .bind(row.breakdown.positive)
    .bind(row.breakdown.neutral)
    .bind(row.breakdown.negative)
    .bind(Json(&row.positive_summary))
    .bind(Json(&row.neutral_summary))
    .bind(Json(&row.negative_summary))
    .bind(Json(&row.raw_comments))
    .fetch_one(pool)
    .await?;

    Ok(UserSentiment::from(stored))
}

/// Return the most recent sentiment row for a user, or `None` if none exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_latest_user_sentiment(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<UserSentiment>, DbError> {
    let row = sqlx::query_as::<_, UserSentimentRow>(
        "SELECT id, user_id, scraped_at, positive_percentage, neutral_percentage, \
                negative_percentage, positive_summary, neutral_summary, negative_summary, \
                raw_comments, created_at \
         FROM user_sentiment_data \
         WHERE user_id = $1 \
         ORDER BY scraped_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(UserSentiment::from))
}
