//! OpenAPI document for the JSON API.

use axum::Json;
use utoipa::OpenApi;

use super::handlers::{
    self, ApiEndpoints, ApiInfo, HealthResponse, SetStatusRequest, TestDataRequest, ViewEndpoints,
};
use crate::process::MemoryUsage;
use crate::service::{
    HealthChecks, HealthReport, HealthState, LegacyPayload, Payload, PayloadData, RuntimeStatus,
    StatusKind, StatusRecord, TestResult,
};

/// OpenAPI description of the JSON endpoints.
#[derive(OpenApi)]
#[openapi(
    info(title = "Status Board API", description = "Diagnostic status endpoints"),
    paths(
        handlers::health,
        handlers::api_info,
        handlers::set_status_get,
        handlers::set_status_post,
        handlers::get_status,
        handlers::test_data,
        handlers::test_health,
        handlers::legacy_test,
    ),
    components(schemas(
        HealthResponse,
        ApiInfo,
        ApiEndpoints,
        ViewEndpoints,
        SetStatusRequest,
        TestDataRequest,
        Payload,
        PayloadData,
        LegacyPayload,
        StatusKind,
        StatusRecord,
        RuntimeStatus,
        MemoryUsage,
        TestResult,
        HealthState,
        HealthChecks,
        HealthReport,
    )),
    tags(
        (name = "health", description = "Liveness and metadata"),
        (name = "test", description = "Status service operations")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
