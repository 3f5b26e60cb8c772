mod api;
mod middleware;

use std::sync::Arc;

use aether_analysis::{GeminiClient, GeminiConfig};
use aether_scan::ScanDeps;
use aether_scraper::HttpFetcher;
use aether_sentiment::{SentimentDeps, SentimentSourceConfig};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = aether_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting aether-server");

    let pool_config = aether_db::PoolConfig::from_app_config(&config);
    let pool = aether_db::connect_pool(&config.database_url, pool_config).await?;
    aether_db::run_migrations(&pool).await?;
    let store = Arc::new(aether_db::PgStore::new(pool));

    let analysis = Arc::new(GeminiClient::new(GeminiConfig {
        api_key: config.gemini_api_key.clone(),
        model: config.gemini_model.clone(),
        base_url: config.gemini_base_url.clone(),
        timeout_secs: config.analysis_timeout_secs,
    })?);
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; scans will fail at the analysis step");
    }

    let fetcher = Arc::new(HttpFetcher::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?);
    let sentiment = SentimentDeps::new(
        &SentimentSourceConfig::from_app_config(&config),
        analysis.clone(),
    )?;

    let state = AppState {
        scan: ScanDeps {
            store,
            fetcher,
            analysis,
            max_concurrency: config.scraper_max_concurrency,
        },
        sentiment: Arc::new(sentiment),
    };
    let auth = AuthState::from_api_keys(&config.api_keys, config.env.is_development())?;
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
