use std::sync::Arc;

use aether_analysis::{analyze_competitor, AnalysisService};
use aether_core::{Insight, ScanStore};
use aether_scraper::{collect_documents, PageFetcher, SourceFailure};
use tracing::Instrument;

use crate::error::ScanError;
use crate::persist::persist_insights;

/// Collaborators for one competitor scan.
#[derive(Clone)]
pub struct ScanDeps {
    pub store: Arc<dyn ScanStore>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub analysis: Arc<dyn AnalysisService>,
    pub max_concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub sources_scraped: usize,
    pub insights_generated: usize,
    pub insights: Vec<Insight>,
    pub failed_sources: Vec<SourceFailure>,
}

impl ScanSummary {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Successfully scraped and analyzed {} sources",
            self.sources_scraped
        )
    }
}

/// Runs one competitor scan on behalf of `user_id`.
///
/// 1. Reject a non-positive `competitor_id`.
/// 2. Load the competitor scoped to `user_id`; absent means access denied.
/// 3. Load its active social accounts.
/// 4. Collect documents, website first; per-source failures are isolated.
/// 5. Analyze every document in one request.
/// 6. Persist one insight per accepted draft.
///
/// Nothing is written unless steps 1-5 succeed.
///
/// # Errors
///
/// - [`ScanError::InvalidCompetitorId`] for `competitor_id <= 0`.
/// - [`ScanError::CompetitorAccessDenied`] when the caller does not own it.
/// - [`ScanError::NoDataScraped`] when no source produced content.
/// - [`ScanError::Analysis`] when the analysis service fails.
/// - [`ScanError::Store`] on store failures, including every insert failing.
pub async fn run_scan(
    deps: &ScanDeps,
    user_id: &str,
    competitor_id: i64,
) -> Result<ScanSummary, ScanError> {
    let span = tracing::info_span!("scan", competitor_id, user_id = %user_id);
    run_scan_inner(deps, user_id, competitor_id)
        .instrument(span)
        .await
}

async fn run_scan_inner(
    deps: &ScanDeps,
    user_id: &str,
    competitor_id: i64,
) -> Result<ScanSummary, ScanError> {
    if competitor_id <= 0 {
        return Err(ScanError::InvalidCompetitorId(competitor_id));
    }

    let competitor = deps
        .store
        .get_competitor(competitor_id, user_id)
        .await?
        .ok_or(ScanError::CompetitorAccessDenied)?;
    let accounts = deps
        .store
        .list_active_social_accounts(competitor_id)
        .await?;

    let report = collect_documents(
        deps.fetcher.as_ref(),
        &competitor,
        &accounts,
        deps.max_concurrency,
    )
    .await?;
    tracing::info!(
        documents = report.documents.len(),
        failed = report.failures.len(),
        "sources collected"
    );

    let outcome =
        analyze_competitor(deps.analysis.as_ref(), &competitor.name, &report.documents).await?;
    tracing::info!(
        drafts = outcome.drafts.len(),
        rejected = outcome.rejected,
        not_significant = outcome.not_significant,
        "analysis complete"
    );

    let insights =
        persist_insights(deps.store.as_ref(), user_id, competitor_id, outcome.drafts).await?;

    Ok(ScanSummary {
        sources_scraped: report.documents.len(),
        insights_generated: insights.len(),
        insights,
        failed_sources: report.failures,
    })
}
