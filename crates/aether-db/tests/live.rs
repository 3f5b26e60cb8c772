//! Live integration tests for aether-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/aether-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use aether_core::{
    InsightDraft, InsightFilter, InsightType, NewInsight, NewUserSentiment, Priority, RawComment,
    ScanStore, SentimentBreakdown, Sentiment,
};
use aether_db::{
    get_competitor_for_owner, insert_competitor, insert_insight, insert_social_account,
    insert_user_sentiment, list_active_social_accounts, list_insights, DbError, NewCompetitor,
    NewSocialAccount, PgStore,
};
use chrono::{Duration, Utc};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_competitor(pool: &sqlx::PgPool, owner: &str, name: &str) -> i64 {
    insert_competitor(
        pool,
        &NewCompetitor {
            user_id: owner,
            name,
            website_url: Some("https://acme.test"),
            industry: None,
        },
    )
    .await
    .unwrap_or_else(|e| panic!("seed_competitor failed for '{name}': {e}"))
    .id
}

fn draft(sentiment: Sentiment, priority: Priority) -> InsightDraft {
    InsightDraft {
        platform: "website".to_string(),
        source_url: Some("https://acme.test".to_string()),
        raw_content: "New pricing: $99/mo".to_string(),
        summary: "Acme cut prices".to_string(),
        insight_type: InsightType::PricingChange,
        sentiment,
        priority,
        key_points: vec!["price".to_string()],
        recommendations: vec![],
        impact: Some("margin pressure".to_string()),
        tags: vec![],
        labels: vec!["pricing".to_string()],
        public_opinion_positive: 20,
        public_opinion_negative: 30,
    }
}

// ---------------------------------------------------------------------------
// Competitors and social accounts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn get_competitor_is_scoped_to_owner(pool: sqlx::PgPool) {
    let id = seed_competitor(&pool, "user-b", "Rival").await;

    let as_a = get_competitor_for_owner(&pool, id, "user-a").await.unwrap();
    assert!(as_a.is_none(), "user-a must not see user-b's competitor");

    let as_b = get_competitor_for_owner(&pool, id, "user-b").await.unwrap();
    assert_eq!(as_b.map(|c| c.name), Some("Rival".to_string()));
}

#[sqlx::test(migrations = "../../migrations")]
async fn social_accounts_are_normalized_and_filtered(pool: sqlx::PgPool) {
    let id = seed_competitor(&pool, "u", "Acme").await;
    insert_social_account(
        &pool,
        &NewSocialAccount {
            competitor_id: id,
            platform: " X ",
            handle: " acme ",
            url: None,
            is_active: true,
        },
    )
    .await
    .unwrap();
    insert_social_account(
        &pool,
        &NewSocialAccount {
            competitor_id: id,
            platform: "linkedin",
            handle: "acme",
            url: None,
            is_active: false,
        },
    )
    .await
    .unwrap();

    let accounts = list_active_social_accounts(&pool, id).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].platform, "twitter");
    assert_eq!(accounts[0].handle, "acme");
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_social_account_rejects_unknown_platform(pool: sqlx::PgPool) {
    let id = seed_competitor(&pool, "u", "Acme").await;
    let err = insert_social_account(
        &pool,
        &NewSocialAccount {
            competitor_id: id,
            platform: "myspace",
            handle: "acme",
            url: None,
            is_active: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DbError::InvalidPlatform(ref p) if p == "myspace"));
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_and_list_insights_round_trip(pool: sqlx::PgPool) {
    let id = seed_competitor(&pool, "u", "Acme").await;
    let now = Utc::now();

    for (minutes, sentiment) in [(5, Sentiment::Neutral), (0, Sentiment::Threat)] {
        insert_insight(
            &pool,
            &NewInsight {
                user_id: "u".to_string(),
                competitor_id: id,
                draft: draft(sentiment, Priority::High),
                detected_at: now - Duration::minutes(minutes),
            },
        )
        .await
        .unwrap();
    }

    let all = list_insights(&pool, "u", &InsightFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].sentiment, Sentiment::Threat, "newest first");
    assert_eq!(all[0].labels, vec!["pricing"]);
    assert_eq!(all[0].created_at, all[0].detected_at);

    let threats = list_insights(
        &pool,
        "u",
        &InsightFilter {
            sentiment: Some(Sentiment::Threat),
            ..InsightFilter::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(threats.len(), 1);

    let other_user = list_insights(&pool, "someone-else", &InsightFilter::default())
        .await
        .unwrap();
    assert!(other_user.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn deleting_competitor_cascades_insights(pool: sqlx::PgPool) {
    let id = seed_competitor(&pool, "u", "Acme").await;
    insert_insight(
        &pool,
        &NewInsight {
            user_id: "u".to_string(),
            competitor_id: id,
            draft: draft(Sentiment::Opportunity, Priority::Low),
            detected_at: Utc::now(),
        },
    )
    .await
    .unwrap();

    sqlx::query("DELETE FROM competitors WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    let remaining = list_insights(&pool, "u", &InsightFilter::default()).await.unwrap();
    assert!(remaining.is_empty());
}

// ---------------------------------------------------------------------------
// User sentiment through the store seam
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn latest_user_sentiment_returns_newest_row(pool: sqlx::PgPool) {
    let store = PgStore::new(pool.clone());
    let now = Utc::now();
    for (minutes, positive) in [(30, 10), (0, 60)] {
        store
            .insert_user_sentiment(NewUserSentiment {
                user_id: "u".to_string(),
                breakdown: SentimentBreakdown {
                    positive,
                    neutral: 100 - positive,
                    negative: 0,
                },
                positive_summary: vec!["love it".to_string()],
                neutral_summary: vec![],
                negative_summary: vec![],
                raw_comments: vec![RawComment {
                    platform: "reddit".to_string(),
                    text: "nice".to_string(),
                    author: None,
                    timestamp: None,
                    url: None,
                }],
                scraped_at: now - Duration::minutes(minutes),
            })
            .await
            .unwrap();
    }

    let latest = store.latest_user_sentiment("u").await.unwrap().unwrap();
    assert_eq!(latest.positive_percentage, 60);
    assert_eq!(latest.raw_comments.len(), 1);
    assert!(store.health_check().await.is_ok());
}

#[sqlx::test(migrations = "../../migrations")]
async fn user_sentiment_sum_must_be_one_hundred(pool: sqlx::PgPool) {
    let err = insert_user_sentiment(
        &pool,
        &NewUserSentiment {
            user_id: "u".to_string(),
            breakdown: SentimentBreakdown {
                positive: 50,
                neutral: 30,
                negative: 30,
            },
            positive_summary: vec![],
            neutral_summary: vec![],
            negative_summary: vec![],
            raw_comments: vec![],
            scraped_at: Utc::now(),
        },
    )
    .await;
    assert!(err.is_err(), "CHECK constraint must reject a 110% breakdown");
}
