//! End-to-end tests for the status board.
//!
//! Requests go through the full router; the probe tests bind a real
//! listener on an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use status_board::api::{create_router, AppState};
use status_board::config::Config;
use status_board::probe::HealthProbe;
use status_board::process::FixedProcessMetrics;
use status_board::service::StatusService;
use status_board::views::ViewRenderer;

/// Config with no artificial delay.
fn test_config() -> Config {
    Config {
        set_status_delay_ms: 0,
        service_name: "IntegrationService".to_string(),
        app_version: "2.3.4".to_string(),
        app_env: "test".to_string(),
        ..Config::default()
    }
}

fn app_with(process: FixedProcessMetrics) -> Router {
    let service = StatusService::new(&test_config(), Arc::new(process));
    let views = ViewRenderer::new().expect("templates compile");
    create_router(AppState::new(service, views))
}

fn app() -> Router {
    app_with(FixedProcessMetrics::healthy())
}

async fn request(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_data_reports_keys_in_request_order() {
    let (status, body) = request(
        app(),
        Method::POST,
        "/api/test/test_data",
        Some(json!({"name": "Al", "email": "a@b.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Test completed successfully");
    assert_eq!(body["input"], json!({"name": "Al", "email": "a@b.com"}));
    assert_eq!(body["result"]["processed"], true);
    assert_eq!(body["result"]["inputKeys"], json!(["name", "email"]));
    assert_eq!(body["result"]["inputCount"], 2);
    assert_eq!(body["service"], "IntegrationService");
}

#[tokio::test]
async fn test_data_accepts_empty_object() {
    let (status, body) = request(app(), Method::POST, "/api/test/test_data", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["inputKeys"], json!([]));
    assert_eq!(body["result"]["inputCount"], 0);
}

#[tokio::test]
async fn test_data_validation_messages() {
    let cases = [
        (json!({"name": "A"}), "\"name\" length must be at least 2 characters long"),
        (json!({"email": "not-an-email"}), "\"email\" must be a valid email"),
        (json!({"age": -1}), "\"age\" must be greater than or equal to 0"),
        (json!({"age": 151}), "\"age\" must be less than or equal to 150"),
        (json!({"data": [1, 2]}), "\"data\" must be of type object"),
    ];

    for (input, expected) in cases {
        let (status, body) = request(app(), Method::POST, "/api/test/test_data", Some(input.clone())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "input {}", input);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["error"], expected, "input {}", input);
    }
}

#[tokio::test]
async fn message_boundary_is_200_characters() {
    let at_limit = "m".repeat(200);
    let (status, _) = request(
        app(),
        Method::POST,
        "/api/test/set_status",
        Some(json!({"message": at_limit})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let over_limit = "m".repeat(201);
    let (status, body) = request(
        app(),
        Method::POST,
        "/api/test/set_status",
        Some(json!({"message": over_limit})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "\"message\" length must be less than or equal to 200 characters long"
    );
}

#[tokio::test]
async fn set_status_record_reflects_config_and_params() {
    let params = json!({"status": "inactive", "message": "Going dark"});
    let (status, body) = request(app(), Method::POST, "/api/test/set_status", Some(params.clone())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Going dark");
    assert_eq!(body["data"]["status"], "inactive");
    assert_eq!(body["data"]["version"], "2.3.4");
    assert_eq!(body["data"]["environment"], "test");
    assert_eq!(body["data"]["customData"], json!({}));
    assert_eq!(body["data"]["requestParams"], params);
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn get_status_reports_fixed_metrics() {
    let process = FixedProcessMetrics::new(Duration::from_secs(90), 10 * 1024 * 1024);
    let (status, body) = request(app_with(process), Method::GET, "/api/test/get_status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "running");
    assert_eq!(body["data"]["uptime"], 90.0);
    assert_eq!(body["data"]["memory"]["rss"], 10 * 1024 * 1024);
    assert_eq!(body["data"]["version"], "2.3.4");
}

#[tokio::test]
async fn health_check_healthy_and_unhealthy() {
    let (status, body) = request(app(), Method::GET, "/api/test/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["health"],
        json!({"status": "healthy", "healthy": true, "checks": {"memoryOk": true, "uptimeOk": true}})
    );

    let fresh = FixedProcessMetrics::new(Duration::ZERO, 1024);
    let (status, body) = request(app_with(fresh), Method::GET, "/api/test/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "Service is unhealthy");
    assert_eq!(body["health"]["checks"]["uptimeOk"], false);
}

#[tokio::test]
async fn legacy_echo_keeps_arbitrary_json() {
    let payload = json!({"items": [1, 2, 3], "nested": {"ok": true}});
    let (status, body) = request(app(), Method::POST, "/api/test/legacy", Some(payload.clone())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["data"], payload);
    assert_eq!(body["service"], "IntegrationService");
}

#[tokio::test]
async fn probe_reports_healthy_instance() {
    let base = spawn_server(app()).await;
    let outcome = HealthProbe::new(base).unwrap().check().await.unwrap();

    assert_eq!(outcome.status.as_u16(), 200);
    assert!(outcome.is_healthy());
}

#[tokio::test]
async fn probe_reports_unhealthy_instance() {
    let process = FixedProcessMetrics::new(Duration::from_secs(5), 1024 * 1024 * 1024);
    let base = spawn_server(app_with(process)).await;
    let outcome = HealthProbe::new(base).unwrap().check().await.unwrap();

    assert_eq!(outcome.status.as_u16(), 503);
    assert!(!outcome.is_healthy());
}
