//! HTTP API Server
//!
//! JSON API over the lookup service: IP lookups plus cache and provider
//! administration.

use crate::application::LookupService;
use crate::domain::errors::LookupError;
use crate::domain::value_objects::IpVersion;
use crate::infrastructure::shutdown_signal;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Lookup request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupRequest {
    pub ip: String,
    #[serde(default)]
    pub ipv_type: Option<String>,
}

/// Lookup query string (`?ip=...&ipv_type=...`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupQuery {
    pub ip: Option<String>,
    pub ipv_type: Option<String>,
}

/// Provider toggle request body.
#[derive(Debug, Clone, Deserialize)]
pub struct EnableProviderRequest {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
}

/// Successful payload envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Successful message envelope.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Error body returned for every failed request.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    details: Option<String>,
}

impl ApiError {
    fn bad_request(error: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
            details: None,
        }
    }

    fn with_details(mut self, details: impl ToString) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

#[derive(Serialize)]
struct ErrorJson {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorJson {
                error: self.error,
                details: self.details,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request format").with_details(rejection.body_text())
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        let status = match e {
            LookupError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LookupError::NoProvidersAvailable | LookupError::AllProvidersFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            error: "Failed to retrieve IP information",
            details: Some(e.to_string()),
        }
    }
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<LookupService>,
}

impl ApiState {
    pub fn new(service: Arc<LookupService>) -> Self {
        Self { service }
    }
}

/// HTTP API Server.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, service: Arc<LookupService>) -> Self {
        Self {
            listen_addr,
            state: ApiState::new(service),
        }
    }

    /// Build the router with every route and middleware layer.
    pub fn router(state: ApiState) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        let v1 = Router::new()
            // IP lookups
            .route("/ip/lookup", get(lookup_query_handler).post(lookup_handler))
            // Cache management
            .route("/cache/stats", get(cache_stats_handler))
            .route("/cache", delete(clear_cache_handler))
            // Provider management
            .route("/providers", get(list_providers_handler))
            .route("/providers/enable", put(enable_provider_handler))
            .route("/health", get(health_handler));

        Router::new()
            .route("/health", get(health_handler))
            .nest("/api/v1", v1)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Run until Ctrl+C or SIGTERM.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self) -> anyhow::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = Self::router(self.state.clone());
        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("IP Check API listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("IP Check API stopped");
        Ok(())
    }
}

// Handler functions

async fn lookup_handler(
    State(state): State<ApiState>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<DataResponse<crate::GeoRecord>>, ApiError> {
    let Json(req) = payload?;
    if req.ip.is_empty() {
        return Err(ApiError::bad_request("Invalid request format").with_details("ip is required"));
    }
    lookup(&state, &req.ip, req.ipv_type.as_deref()).await
}

async fn lookup_query_handler(
    State(state): State<ApiState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<DataResponse<crate::GeoRecord>>, ApiError> {
    let ip = match query.ip.as_deref() {
        Some(ip) if !ip.is_empty() => ip,
        _ => return Err(ApiError::bad_request("IP parameter is required")),
    };
    // An explicit empty `ipv_type=` is not the same as leaving it out
    if query.ipv_type.as_deref() == Some("") {
        if ip.parse::<IpAddr>().is_err() {
            return Err(ApiError::bad_request("Invalid IP address format"));
        }
        return Err(ApiError::bad_request("IPV type must be '4' or '6'"));
    }
    lookup(&state, ip, query.ipv_type.as_deref()).await
}

/// Validation shared by both lookup routes.
async fn lookup(
    state: &ApiState,
    ip: &str,
    ipv_type: Option<&str>,
) -> Result<Json<DataResponse<crate::GeoRecord>>, ApiError> {
    if ip.parse::<IpAddr>().is_err() {
        return Err(ApiError::bad_request("Invalid IP address format"));
    }
    if IpVersion::parse(ipv_type).is_err() {
        return Err(ApiError::bad_request("IPV type must be '4' or '6'"));
    }

    let record = state.service.lookup(ip, ipv_type).await?;
    Ok(Json(DataResponse {
        success: true,
        data: record,
    }))
}

async fn cache_stats_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(DataResponse {
        success: true,
        data: state.service.cache_stats(),
    })
}

async fn clear_cache_handler(State(state): State<ApiState>) -> impl IntoResponse {
    state.service.clear_cache();
    Json(MessageResponse {
        success: true,
        message: "Cache cleared successfully".to_string(),
    })
}

async fn list_providers_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(DataResponse {
        success: true,
        data: state.service.providers(),
    })
}

async fn enable_provider_handler(
    State(state): State<ApiState>,
    payload: Result<Json<EnableProviderRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;

    state
        .service
        .set_provider_enabled(&req.name, req.enabled)
        .map_err(|e| ApiError {
            status: StatusCode::NOT_FOUND,
            error: "Provider not found",
            details: Some(e.to_string()),
        })?;

    let action = if req.enabled { "enabled" } else { "disabled" };
    Ok(Json(MessageResponse {
        success: true,
        message: format!("Provider {} {} successfully", req.name, action),
    }))
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "IP Check API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::adapters::outbound::{DashMapResultCache, InMemoryProviderRegistry, ProviderClients};
    use crate::domain::entities::{GeoRecord, ProviderDescriptor};
    use crate::domain::errors::FetchError;
    use crate::domain::ports::GeoProvider;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    struct FixedProvider {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl GeoProvider for FixedProvider {
        async fn fetch(
            &self,
            _endpoint: &str,
            ip: &str,
            _ip_version: IpVersion,
        ) -> Result<GeoRecord, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Status(502));
            }
            Ok(GeoRecord {
                ip_address: ip.to_string(),
                country_name: "United States".to_string(),
                country_code: "US".to_string(),
                ..Default::default()
            })
        }
    }

    fn state_with(fail: bool) -> (ApiState, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let clients = ProviderClients::new().with(
            "fixed",
            Arc::new(FixedProvider {
                calls: calls.clone(),
                fail,
            }),
        );
        let registry = Arc::new(InMemoryProviderRegistry::new(vec![ProviderDescriptor::new(
            "fixed",
            "http://fixed.test",
        )]));
        let service = LookupService::new(Arc::new(DashMapResultCache::new()), registry, clients);
        (ApiState::new(Arc::new(service)), calls)
    }

    async fn send(state: ApiState, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = ApiServer::router(state).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    // ===== Health Tests =====

    #[tokio::test]
    async fn test_health_endpoints() {
        let (state, _) = state_with(false);
        for uri in ["/health", "/api/v1/health"] {
            let (status, body) = send(state.clone(), get(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["service"], "IP Check API");
            assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        }
    }

    // ===== Lookup Tests =====

    #[tokio::test]
    async fn test_post_lookup_success() {
        let (state, calls) = state_with(false);
        let (status, body) = send(
            state,
            json_request("POST", "/api/v1/ip/lookup", serde_json::json!({"ip": "8.8.8.8"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["ipAddress"], "8.8.8.8");
        assert_eq!(body["data"]["countryCode"], "US");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_lookup_success_and_cached() {
        let (state, calls) = state_with(false);
        for _ in 0..3 {
            let (status, body) =
                send(state.clone(), get("/api/v1/ip/lookup?ip=1.1.1.1&ipv_type=4")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["data"]["countryName"], "United States");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_lookup_missing_ip() {
        let (state, _) = state_with(false);
        let (status, body) = send(state, get("/api/v1/ip/lookup")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "IP parameter is required");
    }

    #[tokio::test]
    async fn test_post_lookup_empty_ip() {
        let (state, calls) = state_with(false);
        let (status, body) = send(
            state,
            json_request("POST", "/api/v1/ip/lookup", serde_json::json!({"ip": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request format");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_lookup_empty_ipv_type() {
        let (state, calls) = state_with(false);
        let (status, body) =
            send(state.clone(), get("/api/v1/ip/lookup?ip=8.8.8.8&ipv_type=")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "IPV type must be '4' or '6'");

        // IP errors are still reported first
        let (_, body) = send(state, get("/api/v1/ip/lookup?ip=bogus&ipv_type=")).await;
        assert_eq!(body["error"], "Invalid IP address format");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_rejects_padded_values() {
        let (state, _) = state_with(false);
        let (status, body) =
            send(state.clone(), get("/api/v1/ip/lookup?ip=%208.8.8.8%20")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid IP address format");

        let (status, body) = send(
            state,
            json_request(
                "POST",
                "/api/v1/ip/lookup",
                serde_json::json!({"ip": "8.8.8.8", "ipv_type": " 6 "}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "IPV type must be '4' or '6'");
    }

    #[tokio::test]
    async fn test_lookup_invalid_ip() {
        let (state, calls) = state_with(false);
        let (status, body) = send(state.clone(), get("/api/v1/ip/lookup?ip=999.1.1.1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid IP address format");

        let (status, _) = send(
            state,
            json_request("POST", "/api/v1/ip/lookup", serde_json::json!({"ip": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_invalid_ipv_type() {
        let (state, _) = state_with(false);
        let (status, body) = send(
            state,
            json_request(
                "POST",
                "/api/v1/ip/lookup",
                serde_json::json!({"ip": "8.8.8.8", "ipv_type": "5"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "IPV type must be '4' or '6'");
    }

    #[tokio::test]
    async fn test_post_lookup_malformed_body() {
        let (state, _) = state_with(false);
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/ip/lookup")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(state, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request format");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_lookup_all_providers_failed() {
        let (state, _) = state_with(true);
        let (status, body) = send(state, get("/api/v1/ip/lookup?ip=8.8.8.8")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to retrieve IP information");
        assert!(body["details"]
            .as_str()
            .unwrap()
            .contains("all providers failed"));
    }

    // ===== Cache Admin Tests =====

    #[tokio::test]
    async fn test_cache_stats_and_clear() {
        let (state, _) = state_with(false);
        send(state.clone(), get("/api/v1/ip/lookup?ip=8.8.8.8")).await;

        let (status, body) = send(state.clone(), get("/api/v1/cache/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total_entries"], 1);
        assert_eq!(body["data"]["entries"][0]["ip"], "8.8.8.8");
        assert_eq!(body["data"]["entries"][0]["expired"], false);
        let cached_at = body["data"]["entries"][0]["cached_at"].as_i64().unwrap();
        let expires_at = body["data"]["entries"][0]["expires_at"].as_i64().unwrap();
        assert_eq!(expires_at - cached_at, Duration::from_secs(3600).as_secs() as i64);

        let req = Request::builder()
            .method("DELETE")
            .uri("/api/v1/cache")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(state.clone(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Cache cleared successfully");

        let (_, body) = send(state, get("/api/v1/cache/stats")).await;
        assert_eq!(body["data"]["total_entries"], 0);
    }

    // ===== Provider Admin Tests =====

    #[tokio::test]
    async fn test_list_providers() {
        let (state, _) = state_with(false);
        let (status, body) = send(state, get("/api/v1/providers")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], "fixed");
        assert_eq!(body["data"][0]["url"], "http://fixed.test");
        assert_eq!(body["data"][0]["enabled"], true);
    }

    #[tokio::test]
    async fn test_enable_provider() {
        let (state, _) = state_with(false);
        let (status, body) = send(
            state.clone(),
            json_request(
                "PUT",
                "/api/v1/providers/enable",
                serde_json::json!({"name": "fixed", "enabled": false}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Provider fixed disabled successfully");

        // No enabled providers left
        let (status, body) = send(state, get("/api/v1/ip/lookup?ip=8.8.8.8")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["details"].as_str().unwrap().contains("no enabled providers"));
    }

    #[tokio::test]
    async fn test_enable_unknown_provider() {
        let (state, _) = state_with(false);
        let (status, body) = send(
            state,
            json_request(
                "PUT",
                "/api/v1/providers/enable",
                serde_json::json!({"name": "missing", "enabled": true}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Provider not found");
        assert_eq!(body["details"], "provider missing not found");
    }

    #[tokio::test]
    async fn test_enable_provider_missing_name() {
        let (state, _) = state_with(false);
        let (status, body) = send(
            state,
            json_request(
                "PUT",
                "/api/v1/providers/enable",
                serde_json::json!({"enabled": true}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request format");
    }

    // ===== CORS Tests =====

    #[tokio::test]
    async fn test_cors_preflight() {
        let (state, _) = state_with(false);
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/ip/lookup")
            .header("origin", "https://example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = ApiServer::router(state).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }

    // ===== Server Tests =====

    #[tokio::test]
    async fn test_run_until_serves_and_stops() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (state, _) = state_with(false);
        let server = ApiServer::new(addr.to_string(), state.service.clone());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server
                .run_until(async {
                    let _ = rx.await;
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        let response = reqwest::Client::new()
            .get(format!("http://{}/health", addr))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
