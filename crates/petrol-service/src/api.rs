//! REST API endpoints for the petrol-service.
//!
//! All ledger endpoints live under `/api`. Any other `GET` falls through to
//! the offline asset cache, which answers cache-first.
//!
//! ## Error Handling
//!
//! Endpoints return structured JSON errors via [`AppError`]. Rejected form
//! input returns 422 with one entry per failing field. An unavailable
//! database returns 503; asset fetch failures return 502.
//!
//! # Example
//!
//! ```ignore
//! use petrol_service::api;
//!
//! let app = api::router().with_state(state);
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{error, warn};

use petrol_cache::{CacheError, CacheStatus, Source};
use petrol_store::{
    DEFAULT_PAGE_SIZE, HistoryStats, LedgerError, RESET_PROMPT, ResetOutcome, Submission,
};
use petrol_types::{CalculatorForm, HistoryPage, HistoryRow, ValidationError, ValidationErrors};

use crate::state::AppState;

/// Header telling clients whether an asset came from the cache.
pub const CACHE_SOURCE_HEADER: &str = "x-petrol-cache";

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/calculations", post(submit_calculation))
        .route("/api/history", get(get_history).delete(reset_history))
        .route("/api/history/all", get(get_all_history))
        .route("/api/history/stats", get(get_stats))
        .route("/api/cache", get(get_cache_status))
        .fallback(serve_asset)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Submit the calculator form.
async fn submit_calculation(
    State(state): State<Arc<AppState>>,
    Json(mut form): Json<CalculatorForm>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let submission = state.ledger.submit(&mut form).await?;
    if !submission.persisted() {
        warn!("Calculation computed but not stored");
    }
    Ok((StatusCode::CREATED, Json(submission)))
}

/// Recent-history view, newest first.
async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<HistoryRow>> {
    Json(state.ledger.load_history().await)
}

/// Query parameters for the full history view.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// One page of the full history.
async fn get_all_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<HistoryPage>, AppError> {
    let page = state
        .ledger
        .view_all(
            query.page.unwrap_or(1),
            query.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<HistoryStats>, AppError> {
    Ok(Json(state.ledger.stats().await?))
}

/// Query parameters for a history reset.
#[derive(Debug, Default, Deserialize)]
pub struct ResetQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Clear all history. Requires `confirm=true`.
async fn reset_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResetQuery>,
) -> Result<Json<ResetOutcome>, AppError> {
    if !query.confirm {
        return Err(AppError::BadRequest(format!(
            "{} Repeat the request with confirm=true.",
            RESET_PROMPT
        )));
    }
    Ok(Json(state.ledger.reset_history(true).await?))
}

async fn get_cache_status(State(state): State<Arc<AppState>>) -> Json<CacheStatus> {
    Json(state.cache.status().await)
}

/// Serve a static asset through the offline cache.
async fn serve_asset(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Result<Response, AppError> {
    if method != Method::GET {
        return Err(AppError::MethodNotAllowed);
    }

    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let served = state.cache.respond(path).await?;

    let status = StatusCode::from_u16(served.response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut headers = HeaderMap::new();
    if let Some(value) = served
        .response
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        headers.insert(header::CONTENT_TYPE, value);
    }
    let source = match served.source {
        Source::Cache => "hit",
        Source::Network => "miss",
    };
    headers.insert(CACHE_SOURCE_HEADER, HeaderValue::from_static(source));

    Ok((status, headers, Body::from(served.response.body)).into_response())
}

/// API error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    MethodNotAllowed,
    Validation(ValidationErrors),
    Ledger(LedgerError),
    Asset(CacheError),
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(e)
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        AppError::Ledger(e)
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::Asset(e)
    }
}

/// Body of a 422 response.
#[derive(Debug, Serialize)]
struct ValidationBody<'a> {
    error: String,
    fields: &'a [ValidationError],
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(errors) => {
                let body = ValidationBody {
                    error: errors.to_string(),
                    fields: errors.errors(),
                };
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            AppError::Ledger(e @ LedgerError::Unavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            AppError::Ledger(e) => {
                error!("Ledger error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Asset(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use petrol_cache::{AssetCache, CacheConfig, DEFAULT_ASSETS, MockFetcher};
    use petrol_store::Ledger;

    use crate::config::Config;
    use crate::state::SharedFetcher;

    fn create_test_state_with(ledger: Ledger) -> (Arc<AppState>, Arc<MockFetcher>) {
        let fetcher = Arc::new(
            MockFetcher::serving(DEFAULT_ASSETS).with_asset("/icon.png", "image/png", "png"),
        );
        let cache = AssetCache::new(CacheConfig::default(), fetcher.clone() as SharedFetcher);
        (AppState::new(ledger, cache, Config::default()), fetcher)
    }

    fn create_test_state() -> (Arc<AppState>, Arc<MockFetcher>) {
        create_test_state_with(Ledger::in_memory())
    }

    async fn response_body(response: Response) -> String {
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn response_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&response_body(response).await).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn reference_form() -> serde_json::Value {
        serde_json::json!({
            "mileage": "500",
            "fuelType": "RON95",
            "litersPrice": "2.05",
            "pumpAmount": "100",
            "durationDays": "7"
        })
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (state, _) = create_test_state();
        let app = router().with_state(state);

        let response = app.oneshot(get("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(json["version"].is_string());
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_submit_calculation() {
        let (state, _) = create_test_state();
        let app = router().with_state(state);

        let response = app
            .oneshot(post_json("/api/calculations", reference_form()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = response_json(response).await;
        assert_eq!(json["headline"], "5.00 KM per RM");
        assert_eq!(json["calculation"]["kmPerRM"], 5.0);
        assert_eq!(json["entry"]["id"], 1);
        assert_eq!(json["entry"]["kmPerRMDisplay"], "5.00");
        assert_eq!(json["history"][0]["litersPrice"], "RM2.05");
        assert!(
            json["summary"]
                .as_str()
                .unwrap()
                .contains("48.78 liters of RON95")
        );
    }

    #[tokio::test]
    async fn test_submit_accepts_numbers_and_legacy_field_name() {
        let (state, _) = create_test_state();
        let app = router().with_state(state);

        let body = serde_json::json!({
            "mileage": 500,
            "pumpRon": "RON97",
            "litersPrice": 3.47,
            "pumpAmount": 50,
            "durationDays": 3
        });
        let response = app
            .oneshot(post_json("/api/calculations", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = response_json(response).await;
        assert_eq!(json["headline"], "10.00 KM per RM");
        assert_eq!(json["input"]["fuelType"], "RON97");
    }

    #[tokio::test]
    async fn test_submit_invalid_returns_field_errors() {
        let (state, _) = create_test_state();
        let app = router().with_state(Arc::clone(&state));

        let body = serde_json::json!({
            "mileage": "abc",
            "fuelType": "RON95",
            "litersPrice": "2.05",
            "pumpAmount": "0",
            "durationDays": "7"
        });
        let response = app
            .oneshot(post_json("/api/calculations", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = response_json(response).await;
        assert!(json["error"].as_str().unwrap().starts_with("Invalid input"));
        let fields: Vec<&str> = json["fields"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["mileage", "pumpAmount"]);
        assert_eq!(json["fields"][1]["kind"], "not_positive");

        assert_eq!(state.ledger.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submit_with_unavailable_store_still_computes() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let (state, _) = create_test_state_with(Ledger::new(blocker.join("data.db")));
        let app = router().with_state(state);

        let response = app
            .clone()
            .oneshot(post_json("/api/calculations", reference_form()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = response_json(response).await;
        assert_eq!(json["headline"], "5.00 KM per RM");
        assert!(json["entry"].is_null());
        assert!(json["history"].is_null());

        let response = app.oneshot(get("/api/history/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_history_is_bounded_and_newest_first() {
        let (state, _) = create_test_state();
        let app = router().with_state(state);

        for _ in 0..12 {
            let response = app
                .clone()
                .oneshot(post_json("/api/calculations", reference_form()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app.oneshot(get("/api/history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0]["id"], 12);
        assert_eq!(rows[9]["id"], 3);
    }

    #[tokio::test]
    async fn test_history_all_pagination() {
        let (state, _) = create_test_state();
        let app = router().with_state(state);

        for _ in 0..5 {
            app.clone()
                .oneshot(post_json("/api/calculations", reference_form()))
                .await
                .unwrap();
        }

        let response = app
            .clone()
            .oneshot(get("/api/history/all?page=2&per_page=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["page"], 2);
        assert_eq!(json["perPage"], 2);
        assert_eq!(json["total"], 5);
        assert_eq!(json["rows"][0]["id"], 3);

        let response = app.oneshot(get("/api/history/all")).await.unwrap();
        let json = response_json(response).await;
        assert_eq!(json["perPage"], 25);
        assert_eq!(json["rows"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_history_stats() {
        let (state, _) = create_test_state();
        let app = router().with_state(state);

        app.clone()
            .oneshot(post_json("/api/calculations", reference_form()))
            .await
            .unwrap();

        let response = app.oneshot(get("/api/history/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["count"], 1);
        assert_eq!(json["averageKmPerRM"], 5.0);
    }

    #[tokio::test]
    async fn test_reset_requires_confirmation() {
        let (state, _) = create_test_state();
        let app = router().with_state(Arc::clone(&state));

        app.clone()
            .oneshot(post_json("/api/calculations", reference_form()))
            .await
            .unwrap();

        let response = app.clone().oneshot(delete("/api/history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("confirm=true"));
        assert_eq!(state.ledger.count().await.unwrap(), 1);

        let response = app
            .clone()
            .oneshot(delete("/api/history?confirm=false"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.ledger.count().await.unwrap(), 1);

        let response = app
            .oneshot(delete("/api/history?confirm=true"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["outcome"], "cleared");
        assert_eq!(json["removed"], 1);
        assert_eq!(json["history"].as_array().unwrap().len(), 0);
        assert_eq!(state.ledger.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_asset_served_from_cache_after_install() {
        let (state, fetcher) = create_test_state();
        state.cache.install().await.unwrap();
        fetcher.reset_calls().await;

        let app = router().with_state(state);
        let response = app.oneshot(get("/style.css")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_SOURCE_HEADER], "hit");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(response_body(response).await, "asset /style.css");
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_uncached_asset_goes_to_network() {
        let (state, fetcher) = create_test_state();
        state.cache.install().await.unwrap();

        let app = router().with_state(state);
        let response = app.oneshot(get("/icon.png")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_SOURCE_HEADER], "miss");
        assert_eq!(fetcher.calls("/icon.png").await, 1);
    }

    #[tokio::test]
    async fn test_asset_fetch_failure_is_bad_gateway() {
        let (state, fetcher) = create_test_state();
        fetcher.set_should_fail(true);

        let app = router().with_state(state);
        let response = app.oneshot(get("/index.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_fallback_rejects_non_get() {
        let (state, fetcher) = create_test_state();
        let app = router().with_state(state);

        let response = app
            .oneshot(post_json("/index.html", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_status_endpoint() {
        let (state, _) = create_test_state();
        let app = router().with_state(Arc::clone(&state));

        let response = app.clone().oneshot(get("/api/cache")).await.unwrap();
        let json = response_json(response).await;
        assert_eq!(json["name"], "petrol-calc-cache-v1");
        assert_eq!(json["state"], "uninstalled");
        assert_eq!(json["paths"].as_array().unwrap().len(), 0);

        state.cache.install().await.unwrap();

        let response = app.oneshot(get("/api/cache")).await.unwrap();
        let json = response_json(response).await;
        assert_eq!(json["state"], "active");
        assert_eq!(json["paths"].as_array().unwrap().len(), 5);
    }
}
