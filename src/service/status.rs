//! Status service operations.
//!
//! Each operation takes already-validated input, never stores anything,
//! and turns every failure into an [`Envelope`] instead of returning an
//! error.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, error, instrument, warn};

use super::envelope::{Envelope, LegacyPayload, Payload, PayloadData};
use super::types::{HealthReport, RuntimeStatus, SetStatusParams, StatusRecord, TestResult};
use crate::config::Config;
use crate::error::ServiceError;
use crate::metrics;
use crate::process::{ProcessMetrics, ProcessSnapshot};
use crate::utils::timestamp_now;

const DEFAULT_SET_STATUS_MESSAGE: &str = "Status set successfully";

/// Stateless status operations.
#[derive(Debug, Clone)]
pub struct StatusService {
    name: String,
    version: String,
    environment: String,
    set_status_delay: Duration,
    memory_limit_bytes: u64,
    process: Arc<dyn ProcessMetrics>,
}

impl StatusService {
    /// Create a service from configuration and a metrics provider.
    pub fn new(config: &Config, process: Arc<dyn ProcessMetrics>) -> Self {
        Self {
            name: config.service_name.clone(),
            version: config.app_version.clone(),
            environment: config.app_env.clone(),
            set_status_delay: config.set_status_delay(),
            memory_limit_bytes: config.health_memory_limit_bytes(),
            process,
        }
    }

    /// Service name reported in responses.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service version reported in responses.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Deployment environment name.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Resident memory limit used by the health check.
    pub fn memory_limit_bytes(&self) -> u64 {
        self.memory_limit_bytes
    }

    /// Take a fresh metrics sample.
    pub fn sample(&self) -> Result<ProcessSnapshot, ServiceError> {
        Ok(self.process.sample()?)
    }

    /// Echo a status change. Nothing is persisted.
    #[instrument(skip(self, params), fields(service = %self.name))]
    pub async fn set_status(&self, params: Map<String, Value>) -> Envelope {
        if !self.set_status_delay.is_zero() {
            tokio::time::sleep(self.set_status_delay).await;
        }

        match self.status_record(params) {
            Ok((message, record)) => {
                debug!(status = %record.status, "Status set");
                Envelope::ok(
                    Payload::new(message)
                        .with_service(&self.name)
                        .with_data(PayloadData::Status(record)),
                )
            }
            Err(err) => self.failure("set_status", err, "Failed to set status"),
        }
    }

    fn status_record(
        &self,
        params: Map<String, Value>,
    ) -> Result<(String, StatusRecord), ServiceError> {
        let parsed: SetStatusParams = serde_json::from_value(Value::Object(params.clone()))?;

        let record = StatusRecord {
            status: parsed.status.unwrap_or_default(),
            version: self.version.clone(),
            environment: self.environment.clone(),
            custom_data: parsed.data.unwrap_or_default(),
            request_params: params,
        };
        let message = parsed
            .message
            .unwrap_or_else(|| DEFAULT_SET_STATUS_MESSAGE.to_string());

        Ok((message, record))
    }

    /// Report `running` with live uptime and memory.
    #[instrument(skip(self), fields(service = %self.name))]
    pub async fn get_status(&self) -> Envelope {
        match self.sample() {
            Ok(snapshot) => Envelope::ok(
                Payload::new("Status retrieved successfully")
                    .with_service(&self.name)
                    .with_data(PayloadData::Runtime(RuntimeStatus::from_snapshot(
                        &snapshot,
                        &self.version,
                    ))),
            ),
            Err(err) => self.failure("get_status", err, "Failed to get status"),
        }
    }

    /// Echo `input` with a summary of its keys.
    #[instrument(skip(self, input), fields(service = %self.name))]
    pub async fn test_with_data(&self, input: Value) -> Envelope {
        match input {
            Value::Object(object) => {
                let result = TestResult::from_input(&object);
                debug!(input_count = result.input_count, "Test data processed");
                Envelope::ok(
                    Payload::new("Test completed successfully")
                        .with_service(&self.name)
                        .with_test(object, result),
                )
            }
            _ => self.failure(
                "test_with_data",
                ServiceError::InvalidInput("Test data must be an object".to_string()),
                "Test failed",
            ),
        }
    }

    /// Evaluate memory and uptime checks.
    ///
    /// Returns 200 when healthy and 503 when a check fails or metrics
    /// cannot be read.
    #[instrument(skip(self), fields(service = %self.name))]
    pub async fn health_check(&self) -> Envelope {
        let snapshot = match self.sample() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                metrics::inc_health_check_failures();
                error!(error = %err, "Health check sampling failed");
                return Envelope::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    Payload::new("Service is unhealthy")
                        .with_service(&self.name)
                        .with_error(err.to_string()),
                );
            }
        };

        let report = HealthReport::evaluate(&snapshot, self.memory_limit_bytes);
        if report.healthy {
            return Envelope::ok(
                Payload::new("Service is healthy")
                    .with_service(&self.name)
                    .with_health(report),
            );
        }

        metrics::inc_health_check_failures();
        warn!(
            memory_ok = report.checks.memory_ok,
            uptime_ok = report.checks.uptime_ok,
            rss = snapshot.memory.rss,
            limit = self.memory_limit_bytes,
            "Health check failed"
        );
        Envelope::new(
            StatusCode::SERVICE_UNAVAILABLE,
            Payload::new("Service is unhealthy")
                .with_service(&self.name)
                .with_health(report),
        )
    }

    /// Echo `data` in the legacy body shape. `null` becomes `{}`.
    #[instrument(skip(self, data), fields(service = %self.name))]
    pub async fn legacy_test(&self, data: Value) -> Envelope<LegacyPayload> {
        let data = match data {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        Envelope::legacy(
            StatusCode::OK,
            LegacyPayload {
                status: true,
                messages: "Data Berhasil Ditambahkan".to_string(),
                error: None,
                data,
                timestamp: timestamp_now(),
                service: self.name.clone(),
            },
        )
    }

    fn failure(&self, operation: &'static str, err: ServiceError, message: &str) -> Envelope {
        let status = err.status_code();
        if err.is_client_error() {
            warn!(operation, error = %err, "Rejected input");
        } else {
            error!(operation, error = %err, "Operation failed");
        }

        Envelope::new(
            status,
            Payload::new(message)
                .with_service(&self.name)
                .with_error(err.to_string()),
        )
    }
}
