use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use aether_analysis::{AnalysisError, AnalysisService};
use aether_core::MemoryStore;
use aether_scraper::{FetchedPage, PageFetcher, ScraperError};
use aether_sentiment::SentimentSourceConfig;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct StaticPages(HashMap<&'static str, &'static str>);

#[async_trait]
impl PageFetcher for StaticPages {
    async fn get(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        Ok(match self.0.get(url) {
            Some(body) => FetchedPage {
                status: 200,
                body: (*body).to_string(),
            },
            None => FetchedPage {
                status: 404,
                body: String::new(),
            },
        })
    }
}

struct Canned(Result<String, u16>);

#[async_trait]
impl AnalysisService for Canned {
    async fn generate(&self, _prompt: &str) -> Result<String, AnalysisError> {
        match &self.0 {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(AnalysisError::UnexpectedStatus {
                status: *status,
                body: String::new(),
            }),
        }
    }
}

fn pricing_answer() -> String {
    json!({
        "insights": [{
            "documentIndex": 0,
            "hasSignificantUpdate": true,
            "summary": "Acme cut prices.",
            "type": "pricing_change",
            "sentiment": "threat",
            "priority": "high"
        }]
    })
    .to_string()
}

struct Harness {
    store: Arc<MemoryStore>,
    analysis: Result<String, u16>,
    sentiment_base_url: String,
    auth: AuthState,
    rate_limit: RateLimitState,
}

impl Harness {
    fn new() -> Self {
        let keys: HashMap<String, String> = [("tok-a", "user-a"), ("tok-b", "user-b")]
            .into_iter()
            .map(|(t, u)| (t.to_string(), u.to_string()))
            .collect();
        Self {
            store: Arc::new(MemoryStore::new()),
            analysis: Ok(pricing_answer()),
            // Nothing listens on the discard port; sentiment sources fail fast.
            sentiment_base_url: "http://127.0.0.1:9".to_string(),
            auth: AuthState::from_api_keys(&keys, false).expect("auth"),
            rate_limit: default_rate_limit_state(),
        }
    }

    fn app(&self) -> Router {
        let analysis: Arc<dyn AnalysisService> = Arc::new(Canned(self.analysis.clone()));
        let fetcher = Arc::new(StaticPages(HashMap::from([(
            "https://acme.test",
            "<h1>New pricing: $99/mo</h1>",
        )])));

        let mut sources = SentimentSourceConfig::new(None, "aether-test/0.1", 2);
        sources.reddit_base_url = self.sentiment_base_url.clone();
        sources.youtube_base_url = self.sentiment_base_url.clone();
        let sentiment = SentimentDeps::new(&sources, analysis.clone()).expect("sentiment deps");

        let state = AppState {
            scan: ScanDeps {
                store: self.store.clone(),
                fetcher,
                analysis,
                max_concurrency: 2,
            },
            sentiment: Arc::new(sentiment),
        };
        build_app(state, self.auth.clone(), self.rate_limit.clone())
    }
}

fn post_json(uri: &str, token: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .header("x-request-id", "req-test")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(req).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).expect("json parse")
    };
    (status, json)
}

// ---------------------------------------------------------------------------
// Health, auth, request ids, rate limiting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_public_and_reports_store_state() {
    let harness = Harness::new();
    let response = harness
        .app()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    harness.store.set_unavailable(true);
    let (status, body) = send(
        harness.app(),
        Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["database"], "unavailable");
}

#[tokio::test]
async fn missing_or_unknown_token_is_unauthorized() {
    let harness = Harness::new();

    let (status, body) = send(
        harness.app(),
        Request::builder()
            .uri("/api/insights")
            .header("x-request-id", "req-401")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(body["requestId"], "req-401");

    let (status, _) = send(harness.app(), get("/api/insights", "tok-zzz")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn development_fallback_uses_user_header() {
    let mut harness = Harness::new();
    harness.auth = AuthState::from_api_keys(&HashMap::new(), true).expect("dev auth");
    let mine = harness
        .store
        .add_competitor("alice", "Acme", Some("https://acme.test"))
        .unwrap();

    let req = Request::builder()
        .method("POST")
        .uri("/api/scrape")
        .header("x-user-id", "alice")
        .body(Body::from(json!({ "competitorId": mine.id }).to_string()))
        .expect("request");
    let (status, _) = send(harness.app(), req).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = Request::builder()
        .method("POST")
        .uri("/api/scrape")
        .body(Body::from(json!({ "competitorId": mine.id }).to_string()))
        .expect("request");
    let (status, body) = send(harness.app(), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "dev-user does not own it");
    assert_eq!(body["code"], "COMPETITOR_ACCESS_DENIED");
}

#[tokio::test]
async fn rate_limiter_rejects_requests_over_the_window() {
    let mut harness = Harness::new();
    harness.rate_limit = RateLimitState::new(1, Duration::from_secs(60));
    let app = harness.app();

    let (first, _) = send(app.clone(), get("/api/insights", "tok-a")).await;
    assert_eq!(first, StatusCode::OK);
    let (second, body) = send(app, get("/api/insights", "tok-a")).await;
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMITED");
}

// ---------------------------------------------------------------------------
// POST /api/scrape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scrape_creates_insights_for_owned_competitor() {
    let harness = Harness::new();
    let acme = harness
        .store
        .add_competitor("user-a", "Acme", Some("https://acme.test"))
        .unwrap();
    harness
        .store
        .add_social_account(acme.id, "twitter", "acme", None, true)
        .unwrap();

    let (status, body) = send(
        harness.app(),
        post_json(
            "/api/scrape",
            "tok-a",
            &json!({ "competitorId": acme.id.to_string() }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["sourcesScraped"], 1);
    assert_eq!(body["insightsGenerated"], 1);
    assert_eq!(body["message"], "Successfully scraped and analyzed 1 sources");
    assert_eq!(body["insights"][0]["insightType"], "pricing_change");
    assert_eq!(body["insights"][0]["userId"], "user-a");
}

#[tokio::test]
async fn scrape_with_no_accepted_drafts_is_ok_not_created() {
    let mut harness = Harness::new();
    harness.analysis = Ok(r#"{"insights":[]}"#.to_string());
    let acme = harness
        .store
        .add_competitor("user-a", "Acme", Some("https://acme.test"))
        .unwrap();

    let (status, body) = send(
        harness.app(),
        post_json("/api/scrape", "tok-a", &json!({ "competitorId": acme.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["insightsGenerated"], 0);
}

#[tokio::test]
async fn scrape_validates_competitor_id_and_body() {
    let harness = Harness::new();

    for bad in [
        json!({}),
        json!({ "competitorId": "abc" }),
        json!({ "competitorId": 0 }),
        json!({ "competitorId": -4 }),
        json!({ "competitorId": 1.5 }),
    ] {
        let (status, body) = send(harness.app(), post_json("/api/scrape", "tok-a", &bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        assert_eq!(body["code"], "INVALID_COMPETITOR_ID", "{bad}");
        assert_eq!(body["requestId"], "req-test");
    }

    let (status, body) = send(
        harness.app(),
        post_json(
            "/api/scrape",
            "tok-a",
            &json!({ "competitorId": 1, "userId": "user-b" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "USER_ID_NOT_ALLOWED");
}

#[tokio::test]
async fn scrape_of_foreign_competitor_is_forbidden() {
    let harness = Harness::new();
    let theirs = harness
        .store
        .add_competitor("user-b", "Rival", Some("https://acme.test"))
        .unwrap();

    let (status, body) = send(
        harness.app(),
        post_json("/api/scrape", "tok-a", &json!({ "competitorId": theirs.id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "COMPETITOR_ACCESS_DENIED");
    assert_eq!(harness.store.insight_count(), 0);
}

#[tokio::test]
async fn scrape_maps_pipeline_failures() {
    let harness = Harness::new();
    let dark = harness
        .store
        .add_competitor("user-a", "Dark", Some("https://gone.test"))
        .unwrap();
    let (status, body) = send(
        harness.app(),
        post_json("/api/scrape", "tok-a", &json!({ "competitorId": dark.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_DATA_SCRAPED");

    let mut failing = Harness::new();
    failing.analysis = Err(503);
    let acme = failing
        .store
        .add_competitor("user-a", "Acme", Some("https://acme.test"))
        .unwrap();
    let (status, body) = send(
        failing.app(),
        post_json("/api/scrape", "tok-a", &json!({ "competitorId": acme.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "ANALYSIS_FAILED");

    failing.analysis = Ok(pricing_answer());
    failing.store.fail_inserts(true);
    let (status, body) = send(
        failing.app(),
        post_json("/api/scrape", "tok-a", &json!({ "competitorId": acme.id })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"], "Internal server error");
}

// ---------------------------------------------------------------------------
// GET /api/insights
// ---------------------------------------------------------------------------

#[tokio::test]
async fn insights_are_scoped_and_filtered() {
    let harness = Harness::new();
    let acme = harness
        .store
        .add_competitor("user-a", "Acme", Some("https://acme.test"))
        .unwrap();
    let rival = harness
        .store
        .add_competitor("user-b", "Rival", Some("https://acme.test"))
        .unwrap();
    send(
        harness.app(),
        post_json("/api/scrape", "tok-a", &json!({ "competitorId": acme.id })),
    )
    .await;
    send(
        harness.app(),
        post_json("/api/scrape", "tok-b", &json!({ "competitorId": rival.id })),
    )
    .await;

    let (status, body) = send(harness.app(), get("/api/insights", "tok-a")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["competitorId"], acme.id);

    let (_, body) = send(
        harness.app(),
        get("/api/insights?sentiment=bullish&limit=abc", "tok-a"),
    )
    .await;
    assert_eq!(body.as_array().map(Vec::len), Some(1), "unknown values ignored");

    let (_, body) = send(
        harness.app(),
        get("/api/insights?sentiment=opportunity", "tok-a"),
    )
    .await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let (status, body) = send(
        harness.app(),
        get(&format!("/api/insights?competitorId={}", rival.id), "tok-a"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "COMPETITOR_ACCESS_DENIED");
}

#[test]
fn insights_query_drops_unknown_labels_and_keeps_numbers() {
    let query = insights::InsightsQuery {
        sentiment: Some("Threat".to_string()),
        priority: Some("urgent".to_string()),
        platform: Some(" LinkedIn ".to_string()),
        limit: Some("500".to_string()),
        offset: Some("x".to_string()),
        ..insights::InsightsQuery::default()
    };
    let filter = query.to_filter(Some(3));
    assert_eq!(filter.competitor_id, Some(3));
    assert_eq!(filter.sentiment, Some(aether_core::Sentiment::Threat));
    assert_eq!(filter.priority, None);
    assert_eq!(filter.platform.as_deref(), Some("linkedin"));
    assert_eq!(filter.effective_limit(), 100);
    assert_eq!(filter.effective_offset(), 0);
}

#[test]
fn competitor_id_accepts_integers_and_numeric_strings() {
    assert_eq!(scan::parse_competitor_id(Some(&json!(12))), Some(12));
    assert_eq!(scan::parse_competitor_id(Some(&json!(" 7 "))), Some(7));
    assert_eq!(scan::parse_competitor_id(Some(&json!("7abc"))), None);
    assert_eq!(scan::parse_competitor_id(Some(&json!(null))), None);
    assert_eq!(scan::parse_competitor_id(None), None);
}

// ---------------------------------------------------------------------------
// User sentiment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sentiment_scrape_validates_handles() {
    let harness = Harness::new();
    let cases = [
        (json!({ "userId": "x", "socialMediaHandles": { "reddit": "r/a" } }), "USER_ID_NOT_ALLOWED"),
        (json!({}), "MISSING_HANDLES"),
        (json!({ "socialMediaHandles": "acme" }), "MISSING_HANDLES"),
        (json!({ "socialMediaHandles": {} }), "NO_HANDLES_PROVIDED"),
        (json!({ "socialMediaHandles": { "youtube": "  " } }), "NO_HANDLES_PROVIDED"),
        (json!({ "socialMediaHandles": { "youtube": 42 } }), "INVALID_YOUTUBE_HANDLE"),
        (json!({ "socialMediaHandles": { "reddit": ["a"] } }), "INVALID_REDDIT_HANDLE"),
        (json!({ "socialMediaHandles": { "twitter": { "h": 1 } } }), "INVALID_TWITTER_HANDLE"),
    ];

    for (body, code) in cases {
        let (status, json) = send(
            harness.app(),
            post_json("/api/user-sentiment/scrape", "tok-a", &body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["code"], code, "{body}");
    }
}

#[tokio::test]
async fn sentiment_scrape_without_comments_is_bad_request() {
    let harness = Harness::new();
    let (status, body) = send(
        harness.app(),
        post_json(
            "/api/user-sentiment/scrape",
            "tok-a",
            &json!({ "socialMediaHandles": { "reddit": "r/acme", "twitter": "@acme" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_COMMENTS_FOUND");
    assert_eq!(harness.store.user_sentiment_count(), 0);
}

#[tokio::test]
async fn sentiment_scrape_persists_and_latest_returns_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/acme/new.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "children": [
                { "data": { "title": "Love the product", "selftext": "" } }
            ]}
        })))
        .mount(&server)
        .await;

    let mut harness = Harness::new();
    harness.sentiment_base_url = server.uri();
    harness.analysis = Ok(
        r#"{"sentimentBreakdown":{"positive":70,"neutral":20,"negative":20},"positiveSummary":["love"]}"#
            .to_string(),
    );

    let (status, none) = send(harness.app(), get("/api/user-sentiment", "tok-a")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(none["sentimentData"].is_null());

    let (status, body) = send(
        harness.app(),
        post_json(
            "/api/user-sentiment/scrape",
            "tok-a",
            &json!({ "socialMediaHandles": { "reddit": "r/acme" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["positive"], 70);
    assert_eq!(body["data"]["neutral"], 10);
    assert_eq!(body["data"]["negative"], 20);
    assert_eq!(
        body["message"],
        "Successfully analyzed sentiment from 1 comments across Reddit"
    );

    let (_, latest) = send(harness.app(), get("/api/user-sentiment", "tok-a")).await;
    assert_eq!(latest["sentimentData"]["id"], body["sentimentId"]);
    assert_eq!(latest["sentimentData"]["positiveSummary"][0], "love");

    let (_, other) = send(harness.app(), get("/api/user-sentiment", "tok-b")).await;
    assert!(other["sentimentData"].is_null());
}
