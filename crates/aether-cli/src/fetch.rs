use aether_core::config::DEFAULT_USER_AGENT;
use aether_scraper::{fetch_social, fetch_website, HttpFetcher};

use crate::FetchTarget;

const FETCH_TIMEOUT_SECS: u64 = 10;

/// Prints the normalized text of one website or social profile.
pub(crate) async fn run_fetch(target: &FetchTarget) -> anyhow::Result<()> {
    let user_agent =
        std::env::var("AETHER_SCRAPER_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
    let fetcher = HttpFetcher::new(FETCH_TIMEOUT_SECS, &user_agent)?;

    let text = match (&target.url, &target.platform, &target.handle) {
        (Some(url), _, _) => fetch_website(&fetcher, url).await?,
        (None, Some(platform), Some(handle)) => {
            let fetched = fetch_social(&fetcher, platform, handle).await?;
            tracing::info!(url = %fetched.url, "fetched profile");
            fetched.content
        }
        _ => anyhow::bail!("pass --url, or --platform together with --handle"),
    };

    println!("{text}");
    Ok(())
}
