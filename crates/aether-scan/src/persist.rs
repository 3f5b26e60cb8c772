use aether_core::{Insight, InsightDraft, NewInsight, ScanStore, StoreError};
use chrono::Utc;

use crate::error::ScanError;

/// Writes one insight per draft for `user_id`/`competitor_id`.
///
/// Every row of one call shares a single `detected_at` timestamp. Inserts are
/// independent: a failed insert is logged and skipped. When there was at
/// least one draft and every insert failed, the store is treated as
/// unavailable and the last error is returned.
///
/// # Errors
///
/// Returns [`ScanError::Store`] when no draft could be written.
pub async fn persist_insights(
    store: &dyn ScanStore,
    user_id: &str,
    competitor_id: i64,
    drafts: Vec<InsightDraft>,
) -> Result<Vec<Insight>, ScanError> {
    let detected_at = Utc::now();
    let attempted = drafts.len();
    let mut stored = Vec::with_capacity(attempted);
    let mut last_error: Option<StoreError> = None;

    for draft in drafts {
        let platform = draft.platform.clone();
        let row = NewInsight {
            user_id: user_id.to_string(),
            competitor_id,
            draft,
            detected_at,
        };
        match store.insert_insight(row).await {
            Ok(insight) => stored.push(insight),
            Err(e) => {
                tracing::warn!(
                    competitor_id,
                    platform = %platform,
                    error = %e,
                    "insight insert failed; skipping"
                );
                last_error = Some(e);
            }
        }
    }

    if stored.is_empty() {
        if let Some(e) = last_error {
            tracing::error!(competitor_id, attempted, "every insight insert failed");
            return Err(ScanError::Store(e));
        }
    }
    Ok(stored)
}
