//! Uniform response envelope.
//!
//! Every service operation returns an [`Envelope`]: the HTTP status plus
//! the JSON body. Constructors derive the body's success flag from the
//! status so the two never disagree.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::types::{HealthReport, RuntimeStatus, StatusRecord, TestResult};
use crate::error::ValidationError;
use crate::utils::timestamp_now;

/// Status code paired with a response body.
#[derive(Debug, Clone)]
pub struct Envelope<T = Payload> {
    /// HTTP status.
    pub status: StatusCode,
    /// JSON body.
    pub data: T,
}

impl<T> Envelope<T> {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl Envelope<Payload> {
    /// Wrap `payload`, aligning its success flag with `status`.
    pub fn new(status: StatusCode, mut payload: Payload) -> Self {
        payload.success = status.is_success();
        Self {
            status,
            data: payload,
        }
    }

    /// 200 response.
    pub fn ok(payload: Payload) -> Self {
        Self::new(StatusCode::OK, payload)
    }

    /// 400 response for input rejected by a schema.
    pub fn validation_failure(err: &ValidationError) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            Payload::new("Validation error").with_error(err.message.clone()),
        )
    }

    /// 400 response for a body that is not valid JSON.
    pub fn malformed_body(reason: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            Payload::new("Validation error").with_error(reason),
        )
    }
}

impl Envelope<LegacyPayload> {
    /// Wrap a legacy payload, aligning its status flag with `status`.
    pub fn legacy(status: StatusCode, mut payload: LegacyPayload) -> Self {
        payload.status = status.is_success();
        Self {
            status,
            data: payload,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.data)).into_response()
    }
}

/// Record carried in the `data` field.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PayloadData {
    /// Result of `set_status`.
    Status(StatusRecord),
    /// Result of `get_status`.
    Runtime(RuntimeStatus),
}

/// Standard response body.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Payload {
    /// Mirrors whether the status is 2xx.
    pub success: bool,
    /// Human readable summary.
    pub message: String,
    /// Failure detail, never a backtrace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 time of the response.
    pub timestamp: String,
    /// Name of the responding service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Status record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PayloadData>,
    /// Echoed test input.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub input: Option<Map<String, Value>>,
    /// Test summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TestResult>,
    /// Health evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthReport>,
}

impl Payload {
    /// Body with `message`, stamped now. Success is set by [`Envelope::new`].
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
            timestamp: timestamp_now(),
            service: None,
            data: None,
            input: None,
            result: None,
            health: None,
        }
    }

    /// Set the service name.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Set the failure detail.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Set the data record.
    pub fn with_data(mut self, data: PayloadData) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the test echo and its summary.
    pub fn with_test(mut self, input: Map<String, Value>, result: TestResult) -> Self {
        self.input = Some(input);
        self.result = Some(result);
        self
    }

    /// Set the health evaluation.
    pub fn with_health(mut self, health: HealthReport) -> Self {
        self.health = Some(health);
        self
    }
}

/// Body shape of the legacy test endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LegacyPayload {
    /// Mirrors whether the status is 2xx.
    pub status: bool,
    /// Human readable summary.
    pub messages: String,
    /// Failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Echoed data.
    #[schema(value_type = Object)]
    pub data: Value,
    /// RFC 3339 time of the response.
    pub timestamp: String,
    /// Name of the responding service.
    pub service: String,
}
