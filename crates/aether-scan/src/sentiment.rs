use aether_core::{ScanStore, UserSentiment};
use aether_sentiment::{run_user_sentiment, SentimentDeps, SocialHandles};

use crate::error::ScanError;

#[derive(Debug, Clone)]
pub struct RecordedSentiment {
    pub row: UserSentiment,
    pub comment_count: usize,
    pub platforms: Vec<&'static str>,
}

impl RecordedSentiment {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Successfully analyzed sentiment from {} comments across {}",
            self.comment_count,
            self.platforms.join(", ")
        )
    }
}

/// Runs a brand-sentiment scan for `user_id` and stores it as a new row.
/// Earlier rows are kept; readers take the most recent one.
///
/// # Errors
///
/// Returns [`ScanError`] when the handles are unusable, nothing was
/// collected, the analysis fails, or the row cannot be written.
pub async fn record_user_sentiment(
    store: &dyn ScanStore,
    deps: &SentimentDeps,
    user_id: &str,
    handles: &SocialHandles,
) -> Result<RecordedSentiment, ScanError> {
    let report = run_user_sentiment(deps, handles).await?;
    let comment_count = report.comments.len();
    let platforms = report.platforms.clone();

    let row = store
        .insert_user_sentiment(report.into_new_row(user_id))
        .await?;
    tracing::info!(
        user_id = %user_id,
        sentiment_id = row.id,
        comments = comment_count,
        "user sentiment recorded"
    );

    Ok(RecordedSentiment {
        row,
        comment_count,
        platforms,
    })
}
