//! Database operations for the `insights` table.

use aether_core::{Insight, InsightFilter, InsightType, NewInsight, Priority, Sentiment};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

const INSIGHT_COLUMNS: &str = "id, user_id, competitor_id, platform, content, summary, \
     insight_type, sentiment, priority, key_points, recommendations, tags, labels, impact, \
     public_opinion_positive, public_opinion_negative, source_url, detected_at, created_at";

/// A row from the `insights` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InsightRow {
    pub id: i64,
    pub user_id: String,
    pub competitor_id: i64,
    pub platform: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub insight_type: String,
    pub sentiment: String,
    pub priority: String,
    pub key_points: Json<Vec<String>>,
    pub recommendations: Json<Vec<String>>,
    pub tags: Json<Vec<String>>,
    pub labels: Json<Vec<String>>,
    pub impact: Option<String>,
    pub public_opinion_positive: i32,
    pub public_opinion_negative: i32,
    pub source_url: Option<String>,
    pub detected_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<InsightRow> for Insight {
    type Error = DbError;

    fn try_from(row: InsightRow) -> Result<Self, Self::Error> {
        let insight_type =
            InsightType::parse(&row.insight_type).ok_or_else(|| DbError::InvalidColumn {
                column: "insight_type",
                value: row.insight_type.clone(),
            })?;
        let sentiment = Sentiment::parse(&row.sentiment).ok_or_else(|| DbError::InvalidColumn {
            column: "sentiment",
            value: row.sentiment.clone(),
        })?;
        let priority = Priority::parse(&row.priority).unwrap_or_default();

        Ok(Insight {
            id: row.id,
            user_id: row.user_id,
            competitor_id: row.competitor_id,
            platform: row.platform,
            content: row.content,
            summary: row.summary,
            insight_type,
            sentiment,
            priority,
            key_points: row.key_points.0,
            recommendations: row.recommendations.0,
            tags: row.tags.0,
            labels: row.labels.0,
            impact: row.impact,
            public_opinion_positive: row.public_opinion_positive,
            public_opinion_negative: row.public_opinion_negative,
            source_url: row.source_url,
            detected_at: row.detected_at,
            created_at: row.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert one insight. `created_at` is stamped with the same instant as
/// `detected_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including CHECK violations).
pub async fn insert_insight(pool: &PgPool, insight: &NewInsight) -> Result<Insight, DbError> {
    let draft = &insight.draft;
    let sql = format!(
        "INSERT INTO insights \
             (user_id, competitor_id, platform, content, summary, insight_type, sentiment, \
              priority, key_points, recommendations, tags, labels, impact, \
              public_opinion_positive, public_opinion_negative, source_url, detected_at, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $17) \
         RETURNING {INSIGHT_COLUMNS}"
    );

    let row = sqlx::query_as::<_, InsightRow>(&sql)
        .bind(&insight.user_id)
        .bind(insight.competitor_id)
        .bind(&draft.platform)
        .bind(&draft.raw_content)
        .bind(&draft.summary)
        .bind(draft.insight_type.as_str())
        .bind(draft.sentiment.as_str())
        .bind(draft.priority.as_str())
        .bind(Json(&draft.key_points))
        .bind(Json(&draft.recommendations))
        .bind(Json(&draft.tags))
        .bind(Json(&draft.labels))
        .bind(draft.impact.as_deref())
        .bind(draft.public_opinion_positive)
        .bind(draft.public_opinion_negative)
        .bind(draft.source_url.as_deref())
        .bind(insight.detected_at)
        .fetch_one(pool)
        .await?;

    Insight::try_from(row)
}

/// List insights owned by `owner_id`, newest `detected_at` first.
///
/// Every `None` filter field is ignored. Limit and offset are clamped by
/// [`InsightFilter::effective_limit`] and [`InsightFilter::effective_offset`].
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_insights(
    pool: &PgPool,
    owner_id: &str,
    filter: &InsightFilter,
) -> Result<Vec<Insight>, DbError> {
    let sql = format!(
        "SELECT {INSIGHT_COLUMNS} \
         FROM insights \
         WHERE user_id = $1 \
           AND ($2::BIGINT IS NULL OR competitor_id = $2) \
           AND ($3::TEXT IS NULL OR sentiment = $3) \
           AND ($4::TEXT IS NULL OR priority = $4) \
           AND ($5::TEXT IS NULL OR platform = $5) \
           AND ($6::TEXT IS NULL OR insight_type = $6) \
         ORDER BY detected_at DESC, id DESC \
         LIMIT $7 OFFSET $8"
    );

    let rows = sqlx::query_as::<_, InsightRow>(&sql)
        .bind(owner_id)
        .bind(filter.competitor_id)
        .bind(filter.sentiment.map(Sentiment::as_str))
        .bind(filter.priority.map(Priority::as_str))
        .bind(filter.platform.as_deref())
        .bind(filter.insight_type.map(InsightType::as_str))
        .bind(filter.effective_limit())
        .bind(filter.effective_offset())
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Insight::try_from).collect()
}
