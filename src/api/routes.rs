//! HTTP route definitions.

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::docs::openapi_json;
use super::handlers::{
    api_info, get_status, health, legacy_test, not_found, prometheus_metrics, set_status_get,
    set_status_post, test_data, test_health, track_requests, AppState,
};
use super::pages;
use crate::error::Result;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/api-info", get(api_info))
        // Status service
        .route("/api/test/set_status", get(set_status_get).post(set_status_post))
        .route("/api/test/get_status", get(get_status))
        .route("/api/test/test_data", post(test_data))
        .route("/api/test/health", get(test_health))
        .route("/api/test/legacy", post(legacy_test))
        // Pages
        .route("/", get(pages::home))
        .route("/dashboard", get(pages::dashboard))
        .route("/test", get(pages::api_test))
        .route("/status", get(pages::status))
        .route("/admin", get(pages::admin))
        .route("/login", get(pages::login))
        // Operations
        .route("/metrics", get(prometheus_metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route_layer(middleware::from_fn(track_requests))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve the application until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::process::FixedProcessMetrics;
    use crate::service::StatusService;
    use crate::views::ViewRenderer;

    fn state_with(process: FixedProcessMetrics) -> AppState {
        let config = Config {
            set_status_delay_ms: 0,
            ..Config::default()
        };
        let service = StatusService::new(&config, Arc::new(process));
        AppState::new(service, ViewRenderer::new().unwrap())
    }

    fn app() -> Router {
        create_router(state_with(FixedProcessMetrics::healthy()))
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header(header::CONTENT_TYPE, "application/json");
        }
        let request = request
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn serve_stops_when_shutdown_resolves() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let state = state_with(FixedProcessMetrics::healthy());

        assert!(serve(addr, state, async {}).await.is_ok());
    }

    #[tokio::test]
    async fn serve_reports_bind_failure() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();
        let state = state_with(FixedProcessMetrics::healthy());

        let result = serve(addr, state, async {}).await;
        assert!(matches!(result, Err(crate::error::AppError::Io(_))));
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let (status, body) = send_json(app(), Method::GET, "/api/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "Server is running");
    }

    #[tokio::test]
    async fn root_health_alias_returns_ok() {
        let (status, _) = send(app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn api_info_lists_endpoints() {
        let (status, body) = send_json(app(), Method::GET, "/api/api-info", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], "1.0.0");
        assert_eq!(body["endpoints"]["views"]["dashboard"], "/dashboard");
    }

    #[tokio::test]
    async fn set_status_get_uses_defaults() {
        let (status, body) = send_json(app(), Method::GET, "/api/test/set_status", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Status set successfully");
        assert_eq!(body["data"]["status"], "active");
        assert_eq!(body["data"]["requestParams"], json!({}));
    }

    #[tokio::test]
    async fn set_status_post_echoes_status() {
        let (status, body) = send_json(
            app(),
            Method::POST,
            "/api/test/set_status",
            Some(r#"{"status":"maintenance","data":{"window":"2h"}}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "maintenance");
        assert_eq!(body["data"]["customData"], json!({"window": "2h"}));
        assert_eq!(body["data"]["environment"], "development");
    }

    #[tokio::test]
    async fn set_status_post_rejects_invalid_status() {
        let (status, body) = send_json(
            app(),
            Method::POST,
            "/api/test/set_status",
            Some(r#"{"status":"paused"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation error");
        assert_eq!(
            body["error"],
            "\"status\" must be one of [active, inactive, maintenance]"
        );
    }

    #[tokio::test]
    async fn set_status_post_without_body_uses_defaults() {
        let (status, body) = send_json(app(), Method::POST, "/api/test/set_status", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "active");
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (status, body) = send_json(
            app(),
            Method::POST,
            "/api/test/test_data",
            Some("{\"name\": "),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn get_status_reports_running() {
        let (status, body) = send_json(app(), Method::GET, "/api/test/get_status", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "running");
        assert!(body["data"]["uptime"].as_f64().unwrap() >= 0.0);
        assert!(body["data"]["memory"]["rss"].is_u64());
    }

    #[tokio::test]
    async fn get_status_is_500_when_metrics_fail() {
        let app = create_router(state_with(FixedProcessMetrics::failing("no metrics")));
        let (status, body) = send_json(app, Method::GET, "/api/test/get_status", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to get status");
    }

    #[tokio::test]
    async fn test_data_rejects_non_object_body() {
        let (status, body) = send_json(app(), Method::POST, "/api/test/test_data", Some("\"hello\"")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "\"value\" must be of type object");
    }

    #[tokio::test]
    async fn test_data_rejects_unknown_field() {
        let (status, body) = send_json(
            app(),
            Method::POST,
            "/api/test/test_data",
            Some(r#"{"name":"Al","role":"admin"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "\"role\" is not allowed");
    }

    #[tokio::test]
    async fn health_is_503_when_unhealthy() {
        let process = FixedProcessMetrics::new(Duration::from_secs(3), 512 * 1024 * 1024);
        let app = create_router(state_with(process));
        let (status, body) = send_json(app, Method::GET, "/api/test/health", None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["health"]["healthy"], false);
        assert_eq!(body["health"]["checks"]["memoryOk"], false);
        assert_eq!(body["health"]["checks"]["uptimeOk"], true);
    }

    #[tokio::test]
    async fn legacy_echoes_body() {
        let (status, body) = send_json(app(), Method::POST, "/api/test/legacy", Some(r#"{"x":1}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], true);
        assert_eq!(body["messages"], "Data Berhasil Ditambahkan");
        assert_eq!(body["data"], json!({"x": 1}));
    }

    #[tokio::test]
    async fn pages_render_html() {
        for uri in ["/", "/dashboard", "/test", "/status", "/admin", "/login"] {
            let (status, body) = send(app(), Method::GET, uri, None).await;
            let html = String::from_utf8(body).unwrap();

            assert_eq!(status, StatusCode::OK, "page {}", uri);
            assert!(html.contains("<!DOCTYPE html>"), "page {}", uri);
        }
    }

    #[tokio::test]
    async fn pages_show_error_when_metrics_fail() {
        let app = create_router(state_with(FixedProcessMetrics::failing("gone")));
        let (status, body) = send(app, Method::GET, "/dashboard", None).await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(html.contains("Failed to load dashboard"));
    }

    #[tokio::test]
    async fn metrics_endpoint_is_404_without_recorder() {
        let (status, _) = send(app(), Method::GET, "/metrics", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn metrics_endpoint_renders_prometheus_text() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        ::metrics::with_local_recorder(&recorder, || {
            crate::metrics::record_http_request(std::time::Instant::now(), "/api/health", 200);
        });

        let state = state_with(FixedProcessMetrics::healthy()).with_prometheus(handle);
        let (status, body) = send(create_router(state), Method::GET, "/metrics", None).await;
        let text = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert!(text.contains("http_requests_total"), "{}", text);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, body) = send_json(app(), Method::GET, "/api-docs/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/test/test_data"].is_object());
    }

    #[tokio::test]
    async fn unknown_route_is_404_envelope() {
        let (status, body) = send_json(app(), Method::GET, "/nope", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
