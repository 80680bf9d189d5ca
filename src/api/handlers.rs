//! HTTP API handlers.
//!
//! Handlers parse the body, run the route's schema and hand the validated
//! input to the [`StatusService`]. Every outcome leaves as an [`Envelope`].

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::process::LiveProcessMetrics;
use crate::service::{Envelope, LegacyPayload, Payload, StatusService};
use crate::utils::timestamp_now;
use crate::validation::{Schema, SET_STATUS_SCHEMA, TEST_DATA_SCHEMA};
use crate::views::ViewRenderer;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Status operations.
    pub service: Arc<StatusService>,
    /// Page renderer.
    pub views: Arc<ViewRenderer>,
    /// Prometheus exporter, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(service: StatusService, views: ViewRenderer) -> Self {
        Self {
            service: Arc::new(service),
            views: Arc::new(views),
            prometheus: None,
        }
    }

    /// Build state backed by live process metrics.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate().map_err(AppError::InvalidConfig)?;
        let service = StatusService::new(config, Arc::new(LiveProcessMetrics::new()));
        Ok(Self::new(service, ViewRenderer::new()?))
    }

    /// Expose metrics from `handle` at `/metrics`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

/// Liveness response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "OK".
    pub status: String,
    /// Human readable summary.
    pub message: String,
    /// RFC 3339 time of the response.
    pub timestamp: String,
}

/// API metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiInfo {
    /// Greeting.
    pub message: String,
    /// Service version.
    pub version: String,
    /// Where things live.
    pub endpoints: ApiEndpoints,
}

/// Endpoint map in [`ApiInfo`].
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiEndpoints {
    /// Liveness endpoint.
    pub health: String,
    /// JSON API root.
    pub api: String,
    /// Test endpoints root.
    pub test: String,
    /// OpenAPI document.
    pub docs: String,
    /// Prometheus metrics.
    pub metrics: String,
    /// HTML pages.
    pub views: ViewEndpoints,
}

/// Page map in [`ApiInfo`].
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewEndpoints {
    /// Home page.
    pub home: String,
    /// Dashboard page.
    pub dashboard: String,
    /// API testing page.
    pub test: String,
    /// Status page.
    pub status: String,
    /// Admin page.
    pub admin: String,
}

/// Documented body of `set_status`.
#[derive(Debug, ToSchema)]
pub struct SetStatusRequest {
    /// One of active, inactive, maintenance.
    pub status: Option<crate::service::StatusKind>,
    /// At most 200 characters.
    pub message: Option<String>,
    /// Free-form object echoed back.
    #[schema(value_type = Option<Object>)]
    pub data: Option<Map<String, Value>>,
}

/// Documented body of `test_data`.
#[derive(Debug, ToSchema)]
pub struct TestDataRequest {
    /// 2 to 50 characters.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Integer between 0 and 150.
    pub age: Option<i64>,
    /// Free-form object.
    #[schema(value_type = Option<Object>)]
    pub data: Option<Map<String, Value>>,
    /// At most 200 characters.
    pub message: Option<String>,
}

/// Parse a request body leniently: blank means `{}`.
fn parse_body(body: &[u8]) -> std::result::Result<Value, Envelope> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body).map_err(|e| Envelope::malformed_body(e.to_string()))
}

/// Parse and validate a body against `schema`.
fn validated(
    endpoint: &'static str,
    schema: &Schema,
    body: &[u8],
) -> std::result::Result<Map<String, Value>, Envelope> {
    let result = parse_body(body).and_then(|input| {
        schema
            .validate(&input)
            .map_err(|err| Envelope::validation_failure(&err))
    });

    if let Err(rejection) = &result {
        metrics::inc_validation_failures(endpoint);
        warn!(
            endpoint,
            error = rejection.data.error.as_deref().unwrap_or_default(),
            "Request rejected"
        );
    }
    result
}

/// Liveness handler - always returns 200.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses((status = 200, description = "Server is running", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        timestamp: timestamp_now(),
    })
}

/// API metadata handler.
#[utoipa::path(
    get,
    path = "/api/api-info",
    tag = "health",
    responses((status = 200, description = "API metadata", body = ApiInfo))
)]
pub async fn api_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiInfo {
        message: "Welcome to Status Board API".to_string(),
        version: state.service.version().to_string(),
        endpoints: ApiEndpoints {
            health: "/health".to_string(),
            api: "/api".to_string(),
            test: "/api/test".to_string(),
            docs: "/api-docs/openapi.json".to_string(),
            metrics: "/metrics".to_string(),
            views: ViewEndpoints {
                home: "/".to_string(),
                dashboard: "/dashboard".to_string(),
                test: "/test".to_string(),
                status: "/status".to_string(),
                admin: "/admin".to_string(),
            },
        },
    })
}

/// Set status without a body; every field takes its default.
#[utoipa::path(
    get,
    path = "/api/test/set_status",
    tag = "test",
    responses(
        (status = 200, description = "Status echoed", body = Payload),
        (status = 500, description = "Internal fault", body = Payload)
    )
)]
pub async fn set_status_get(State(state): State<AppState>) -> Envelope {
    state.service.set_status(Map::new()).await
}

/// Set status from a JSON body.
#[utoipa::path(
    post,
    path = "/api/test/set_status",
    tag = "test",
    request_body(content = SetStatusRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Status echoed", body = Payload),
        (status = 400, description = "Validation error", body = Payload),
        (status = 500, description = "Internal fault", body = Payload)
    )
)]
pub async fn set_status_post(State(state): State<AppState>, body: Bytes) -> Envelope {
    match validated("set_status", &SET_STATUS_SCHEMA, &body) {
        Ok(params) => state.service.set_status(params).await,
        Err(rejection) => rejection,
    }
}

/// Runtime status handler.
#[utoipa::path(
    get,
    path = "/api/test/get_status",
    tag = "test",
    responses(
        (status = 200, description = "Process is running", body = Payload),
        (status = 500, description = "Metrics unavailable", body = Payload)
    )
)]
pub async fn get_status(State(state): State<AppState>) -> Envelope {
    state.service.get_status().await
}

/// Validate and echo test data.
#[utoipa::path(
    post,
    path = "/api/test/test_data",
    tag = "test",
    request_body(content = TestDataRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Input summarized", body = Payload),
        (status = 400, description = "Validation error", body = Payload),
        (status = 500, description = "Internal fault", body = Payload)
    )
)]
pub async fn test_data(State(state): State<AppState>, body: Bytes) -> Envelope {
    match validated("test_data", &TEST_DATA_SCHEMA, &body) {
        Ok(input) => state.service.test_with_data(Value::Object(input)).await,
        Err(rejection) => rejection,
    }
}

/// Health check handler - returns 200 if healthy, 503 otherwise.
#[utoipa::path(
    get,
    path = "/api/test/health",
    tag = "test",
    responses(
        (status = 200, description = "Service is healthy", body = Payload),
        (status = 503, description = "Service is unhealthy", body = Payload)
    )
)]
pub async fn test_health(State(state): State<AppState>) -> Envelope {
    state.service.health_check().await
}

/// Legacy echo handler.
#[utoipa::path(
    post,
    path = "/api/test/legacy",
    tag = "test",
    request_body(content = Object, content_type = "application/json"),
    responses(
        (status = 200, description = "Data echoed", body = LegacyPayload),
        (status = 400, description = "Malformed JSON", body = Payload)
    )
)]
pub async fn legacy_test(State(state): State<AppState>, body: Bytes) -> Response {
    match parse_body(&body) {
        Ok(data) => state.service.legacy_test(data).await.into_response(),
        Err(rejection) => {
            metrics::inc_validation_failures("legacy");
            rejection.into_response()
        }
    }
}

/// Prometheus exposition, 404 when no recorder is installed.
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.prometheus {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> Envelope {
    Envelope::new(StatusCode::NOT_FOUND, Payload::new("Not found"))
}

/// Middleware recording latency and status per matched route.
pub async fn track_requests(matched: Option<MatchedPath>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = matched
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    metrics::record_http_request(start, &endpoint, response.status().as_u16());
    response
}
