//! Store-backed command handlers: migrate, scan, sentiment.

use std::sync::Arc;

use aether_analysis::{GeminiClient, GeminiConfig};
use aether_core::AppConfig;
use aether_db::PgStore;
use aether_scan::{record_user_sentiment, run_scan, ScanDeps};
use aether_scraper::HttpFetcher;
use aether_sentiment::{SentimentDeps, SentimentSourceConfig, SocialHandles};
use serde_json::json;

use crate::HandleArgs;

async fn connect(config: &AppConfig) -> anyhow::Result<PgStore> {
    let pool_config = aether_db::PoolConfig::from_app_config(config);
    let pool = aether_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(PgStore::new(pool))
}

fn gemini(config: &AppConfig) -> anyhow::Result<Arc<GeminiClient>> {
    if config.gemini_api_key.is_none() {
        anyhow::bail!("GEMINI_API_KEY is required to run analysis");
    }
    Ok(Arc::new(GeminiClient::new(GeminiConfig {
        api_key: config.gemini_api_key.clone(),
        model: config.gemini_model.clone(),
        base_url: config.gemini_base_url.clone(),
        timeout_secs: config.analysis_timeout_secs,
    })?))
}

pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let store = connect(config).await?;
    let applied = aether_db::run_migrations(store.pool()).await?;
    tracing::info!(applied, "migrations applied");
    println!("{applied} migrations applied");
    Ok(())
}

pub(crate) async fn run_scan_command(
    config: &AppConfig,
    user_id: &str,
    competitor_id: i64,
) -> anyhow::Result<()> {
    let deps = ScanDeps {
        store: Arc::new(connect(config).await?),
        fetcher: Arc::new(HttpFetcher::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
        )?),
        analysis: gemini(config)?,
        max_concurrency: config.scraper_max_concurrency,
    };

    let summary = run_scan(&deps, user_id, competitor_id).await?;
    let failed: Vec<_> = summary
        .failed_sources
        .iter()
        .map(|f| json!({ "platform": f.platform, "source": f.identifier, "error": f.error }))
        .collect();
    let output = json!({
        "message": summary.message(),
        "sourcesScraped": summary.sources_scraped,
        "insightsGenerated": summary.insights_generated,
        "insights": summary.insights,
        "failedSources": failed,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) async fn run_sentiment_command(
    config: &AppConfig,
    user_id: &str,
    handles: HandleArgs,
) -> anyhow::Result<()> {
    let store = connect(config).await?;
    let deps = SentimentDeps::new(
        &SentimentSourceConfig::from_app_config(config),
        gemini(config)?,
    )?;
    let handles = SocialHandles {
        youtube: handles.youtube,
        reddit: handles.reddit,
        twitter: handles.twitter,
    };

    let recorded = record_user_sentiment(&store, &deps, user_id, &handles).await?;
    let output = json!({
        "message": recorded.message(),
        "sentimentId": recorded.row.id,
        "data": {
            "positive": recorded.row.positive_percentage,
            "neutral": recorded.row.neutral_percentage,
            "negative": recorded.row.negative_percentage,
        },
        "positiveSummary": recorded.row.positive_summary,
        "neutralSummary": recorded.row.neutral_summary,
        "negativeSummary": recorded.row.negative_summary,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
