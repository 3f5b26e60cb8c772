use aether_core::Insight;
use aether_scan::run_scan;
use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::{AuthenticatedUser, RequestId};

use super::{map_scan_error, parse_body, reject_user_id, ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScrapeResponse {
    pub message: String,
    pub sources_scraped: usize,
    pub insights_generated: usize,
    pub insights: Vec<Insight>,
}

/// Accepts a positive integer or a string holding one.
pub(super) fn parse_competitor_id(value: Option<&Value>) -> Option<i64> {
    let id = match value? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

pub(super) async fn trigger_scan(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<ScrapeResponse>), ApiError> {
    let body = parse_body(&body);
    reject_user_id(&req_id.0, &body)?;

    let competitor_id = parse_competitor_id(body.get("competitorId")).ok_or_else(|| {
        ApiError::bad_request(
            req_id.0.clone(),
            "INVALID_COMPETITOR_ID",
            "Valid competitor ID is required",
        )
    })?;

    let summary = run_scan(&state.scan, &user.0, competitor_id)
        .await
        .map_err(|e| map_scan_error(req_id.0.clone(), &e))?;

    let status = if summary.insights_generated > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(ScrapeResponse {
            message: summary.message(),
            sources_scraped: summary.sources_scraped,
            insights_generated: summary.insights_generated,
            insights: summary.insights,
        }),
    ))
}
