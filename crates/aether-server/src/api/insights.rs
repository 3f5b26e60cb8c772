use aether_core::{Insight, InsightFilter, InsightType, Priority, Sentiment};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::middleware::{AuthenticatedUser, RequestId};

use super::{map_store_error, ApiError, AppState};

/// Raw query string. Every value is read as text so a bad enum or number
/// can be ignored instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InsightsQuery {
    pub competitor_id: Option<String>,
    pub sentiment: Option<String>,
    pub priority: Option<String>,
    pub platform: Option<String>,
    pub insight_type: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

impl InsightsQuery {
    /// Unknown enum labels and unparseable numbers are dropped.
    pub(super) fn to_filter(&self, competitor_id: Option<i64>) -> InsightFilter {
        let mut filter = InsightFilter {
            competitor_id,
            sentiment: self.sentiment.as_deref().and_then(Sentiment::parse),
            priority: self.priority.as_deref().and_then(Priority::parse),
            platform: self
                .platform
                .as_deref()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty()),
            insight_type: self.insight_type.as_deref().and_then(InsightType::parse),
            ..InsightFilter::default()
        };
        if let Some(limit) = parse_number(self.limit.as_deref()) {
            filter.limit = limit;
        }
        if let Some(offset) = parse_number(self.offset.as_deref()) {
            filter.offset = offset;
        }
        filter
    }
}

pub(super) async fn list_insights(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<InsightsQuery>,
) -> Result<Json<Vec<Insight>>, ApiError> {
    let competitor_id = match query.competitor_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| {
                    ApiError::bad_request(
                        req_id.0.clone(),
                        "INVALID_COMPETITOR_ID",
                        "Valid competitor ID is required",
                    )
                })?,
        ),
    };

    if let Some(id) = competitor_id {
        let owned = state
            .store()
            .get_competitor(id, &user.0)
            .await
            .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
        if owned.is_none() {
            return Err(ApiError::new(
                req_id.0,
                StatusCode::FORBIDDEN,
                "COMPETITOR_ACCESS_DENIED",
                "Competitor not found or access denied",
            ));
        }
    }

    let filter = query.to_filter(competitor_id);
    let rows = state
        .store()
        .list_insights(&user.0, &filter)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(Json(rows))
}
