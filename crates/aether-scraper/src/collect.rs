//! Fan-out over a competitor's website and active social accounts.

use aether_core::{Competitor, Platform, ScrapedDocument, SocialAccount, WEBSITE_PLATFORM};
use futures::stream::{self, StreamExt};

use crate::error::ScraperError;
use crate::fetch::{fetch_social, fetch_website, PageFetcher};

/// One source to fetch during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Website {
        url: String,
    },
    Social {
        platform: String,
        handle: String,
        /// Explicit profile URL configured on the account.
        url: Option<String>,
    },
}

impl SourceSpec {
    #[must_use]
    pub fn platform(&self) -> &str {
        match self {
            SourceSpec::Website { .. } => WEBSITE_PLATFORM,
            SourceSpec::Social { platform, .. } => platform,
        }
    }

    /// URL or handle identifying the source in logs and failure reports.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            SourceSpec::Website { url } => url,
            SourceSpec::Social { handle, url, .. } => url.as_deref().unwrap_or(handle),
        }
    }
}

/// A source paired with the result of fetching it.
#[derive(Debug)]
pub struct SourceOutcome {
    pub source: SourceSpec,
    pub result: Result<ScrapedDocument, ScraperError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub platform: String,
    pub identifier: String,
    pub error: String,
}

/// Documents in source order, plus every source that produced nothing.
#[derive(Debug, Default)]
pub struct CollectReport {
    pub documents: Vec<ScrapedDocument>,
    pub failures: Vec<SourceFailure>,
}

/// Website first (when configured), then one source per active account.
#[must_use]
pub fn plan_sources(competitor: &Competitor, accounts: &[SocialAccount]) -> Vec<SourceSpec> {
    let website = competitor
        .website_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| SourceSpec::Website {
            url: url.to_string(),
        });

    let socials = accounts
        .iter()
        .filter(|account| account.is_active)
        .map(|account| SourceSpec::Social {
            platform: account.platform.clone(),
            handle: account.handle.clone(),
            url: account
                .url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
        });

    website.into_iter().chain(socials).collect()
}

/// Fetches every source with at most `max_concurrency` requests in flight.
/// Outcomes come back in the same order as `sources`.
pub async fn fetch_sources(
    fetcher: &dyn PageFetcher,
    sources: Vec<SourceSpec>,
    max_concurrency: usize,
) -> Vec<SourceOutcome> {
    stream::iter(sources)
        .map(|source| async move {
            let result = fetch_source(fetcher, &source).await;
            SourceOutcome { source, result }
        })
        .buffered(max_concurrency.max(1))
        .collect()
        .await
}

async fn fetch_source(
    fetcher: &dyn PageFetcher,
    source: &SourceSpec,
) -> Result<ScrapedDocument, ScraperError> {
    match source {
        SourceSpec::Website { url } => {
            let content = fetch_website(fetcher, url).await?;
            Ok(ScrapedDocument {
                platform: WEBSITE_PLATFORM.to_string(),
                url: url.clone(),
                content,
            })
        }
        SourceSpec::Social {
            platform,
            handle,
            url,
        } => {
            let target = url.as_deref().unwrap_or(handle);
            let fetched = fetch_social(fetcher, platform, target).await?;
            // Aliases such as `x` are reported under their canonical name.
            let platform = Platform::parse(platform).map_or_else(
                || platform.clone(),
                |resolved| resolved.as_str().to_string(),
            );
            Ok(ScrapedDocument {
                platform,
                url: url.clone().unwrap_or(fetched.url),
                content: fetched.content,
            })
        }
    }
}

/// Collects plain-text documents from a competitor's website and active
/// social accounts.
///
/// Each source is isolated: a failure is logged, recorded in
/// [`CollectReport::failures`], and the source is omitted.
///
/// # Errors
///
/// Returns [`ScraperError::NoDataScraped`] when no source produced content.
pub async fn collect_documents(
    fetcher: &dyn PageFetcher,
    competitor: &Competitor,
    accounts: &[SocialAccount],
    max_concurrency: usize,
) -> Result<CollectReport, ScraperError> {
    let sources = plan_sources(competitor, accounts);
    tracing::debug!(
        competitor_id = competitor.id,
        sources = sources.len(),
        "collecting competitor sources"
    );

    let mut report = CollectReport::default();
    for outcome in fetch_sources(fetcher, sources, max_concurrency).await {
        match outcome.result {
            Ok(document) => report.documents.push(document),
            Err(e) => {
                tracing::warn!(
                    competitor_id = competitor.id,
                    platform = outcome.source.platform(),
                    source = outcome.source.identifier(),
                    error = %e,
                    "source fetch failed; omitting"
                );
                report.failures.push(SourceFailure {
                    platform: outcome.source.platform().to_string(),
                    identifier: outcome.source.identifier().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    if report.documents.is_empty() {
        return Err(ScraperError::NoDataScraped);
    }
    Ok(report)
}
