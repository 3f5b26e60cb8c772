mod insights;
mod scan;
mod sentiment;

use std::sync::Arc;
use std::time::Duration;

use aether_core::{ScanStore, StoreError};
use aether_scan::{ScanDeps, ScanError};
use aether_sentiment::SentimentDeps;
use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub scan: ScanDeps,
    pub sentiment: Arc<SentimentDeps>,
}

impl AppState {
    fn store(&self) -> &dyn ScanStore {
        self.scan.store.as_ref()
    }
}

/// Error response: `{"error", "code", "requestId"}` with the HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    code: &'static str,
    request_id: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                code,
                request_id: request_id.into(),
            },
        }
    }

    pub(crate) fn bad_request(
        request_id: impl Into<String>,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::new(request_id, StatusCode::BAD_REQUEST, code, message)
    }

    pub(crate) fn internal(request_id: impl Into<String>) -> Self {
        Self::new(
            request_id,
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    tracing::error!(request_id = %request_id, error = %error, "store call failed");
    ApiError::internal(request_id)
}

/// Maps a pipeline failure to its status and code. Internal details are
/// logged, never returned.
pub(super) fn map_scan_error(request_id: String, error: &ScanError) -> ApiError {
    let code = error.code();
    let (status, message) = match error {
        ScanError::InvalidCompetitorId(_) => (
            StatusCode::BAD_REQUEST,
            "Valid competitor ID is required".to_string(),
        ),
        ScanError::CompetitorAccessDenied => (
            StatusCode::FORBIDDEN,
            "Competitor not found or access denied".to_string(),
        ),
        ScanError::NoDataScraped => (
            StatusCode::BAD_REQUEST,
            "No data could be scraped from competitor sources".to_string(),
        ),
        ScanError::NoHandlesProvided => (
            StatusCode::BAD_REQUEST,
            "At least one social media handle must be provided".to_string(),
        ),
        ScanError::NoCommentsFound => (
            StatusCode::BAD_REQUEST,
            "No comments could be scraped from provided social media handles".to_string(),
        ),
        ScanError::Analysis(e) => {
            tracing::error!(request_id = %request_id, error = %e, "analysis service failed");
            (
                StatusCode::BAD_GATEWAY,
                "Analysis service unavailable".to_string(),
            )
        }
        ScanError::Store(_) | ScanError::Scraper(_) | ScanError::Sentiment(_) => {
            tracing::error!(request_id = %request_id, error = %error, "scan failed");
            return ApiError::internal(request_id);
        }
    };
    ApiError::new(request_id, status, code, message)
}

/// Rejects bodies that try to choose the acting user.
pub(super) fn reject_user_id(request_id: &str, body: &Value) -> Result<(), ApiError> {
    let Some(obj) = body.as_object() else {
        return Ok(());
    };
    if obj.contains_key("userId") || obj.contains_key("user_id") {
        return Err(ApiError::bad_request(
            request_id,
            "USER_ID_NOT_ALLOWED",
            "User ID cannot be provided in request body",
        ));
    }
    Ok(())
}

/// Lenient JSON body read: anything unparseable is treated as `null`.
pub(super) fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("x-user-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/scrape", post(scan::trigger_scan))
        .route("/api/insights", get(insights::list_insights))
        .route("/api/user-sentiment", get(sentiment::latest_user_sentiment))
        .route(
            "/api/user-sentiment/scrape",
            post(sentiment::trigger_user_sentiment),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match state.store().health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(request_id = %req_id.0, error = %e, "health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests;
