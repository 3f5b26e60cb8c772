use aether_core::{SentimentBreakdown, UserSentiment};
use aether_scan::record_user_sentiment;
use aether_sentiment::SocialHandles;
use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::Value;

use crate::middleware::{AuthenticatedUser, RequestId};

use super::{map_scan_error, map_store_error, parse_body, reject_user_id, ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SentimentScrapeResponse {
    pub success: bool,
    pub message: String,
    pub sentiment_id: i64,
    pub data: SentimentBreakdown,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LatestSentimentResponse {
    pub sentiment_data: Option<UserSentiment>,
}

/// Reads one optional handle, rejecting anything that is present but not a
/// string. `null` and `""` count as absent.
fn handle_field(
    request_id: &str,
    handles: &serde_json::Map<String, Value>,
    key: &str,
    code: &'static str,
    label: &str,
) -> Result<Option<String>, ApiError> {
    match handles.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(ApiError::bad_request(
            request_id,
            code,
            format!("{label} handle must be a string"),
        )),
    }
}

/// Validates the request body in the order the API documents its errors.
pub(super) fn parse_handles(request_id: &str, body: &Value) -> Result<SocialHandles, ApiError> {
    reject_user_id(request_id, body)?;

    let handles = body
        .get("socialMediaHandles")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ApiError::bad_request(
                request_id,
                "MISSING_HANDLES",
                "Social media handles object is required",
            )
        })?;

    let youtube = handle_field(request_id, handles, "youtube", "INVALID_YOUTUBE_HANDLE", "YouTube")?;
    let reddit = handle_field(request_id, handles, "reddit", "INVALID_REDDIT_HANDLE", "Reddit")?;
    let twitter = handle_field(request_id, handles, "twitter", "INVALID_TWITTER_HANDLE", "Twitter")?;

    let parsed = SocialHandles {
        youtube,
        reddit,
        twitter,
    };
    if parsed.is_empty() {
        return Err(ApiError::bad_request(
            request_id,
            "NO_HANDLES_PROVIDED",
            "At least one social media handle must be provided",
        ));
    }
    Ok(parsed)
}

pub(super) async fn trigger_user_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<SentimentScrapeResponse>), ApiError> {
    let body = parse_body(&body);
    let handles = parse_handles(&req_id.0, &body)?;

    let recorded = record_user_sentiment(state.store(), &state.sentiment, &user.0, &handles)
        .await
        .map_err(|e| map_scan_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(SentimentScrapeResponse {
            success: true,
            message: recorded.message(),
            sentiment_id: recorded.row.id,
            data: SentimentBreakdown {
                positive: recorded.row.positive_percentage,
                neutral: recorded.row.neutral_percentage,
                negative: recorded.row.negative_percentage,
            },
        }),
    ))
}

pub(super) async fn latest_user_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<LatestSentimentResponse>, ApiError> {
    let sentiment_data = state
        .store()
        .latest_user_sentiment(&user.0)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;
    Ok(Json(LatestSentimentResponse { sentiment_data }))
}
