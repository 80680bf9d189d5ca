//! Records produced by the status service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};
use utoipa::ToSchema;

use crate::process::{MemoryUsage, ProcessSnapshot};

/// Status a client may set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    /// Serving normally.
    #[default]
    Active,
    /// Deliberately switched off.
    Inactive,
    /// Under maintenance.
    Maintenance,
}

/// Validated input of `set_status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetStatusParams {
    /// Requested status.
    #[serde(default)]
    pub status: Option<StatusKind>,
    /// Custom message.
    #[serde(default)]
    pub message: Option<String>,
    /// Free-form data echoed back as `customData`.
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

/// Echo of a `set_status` call. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    /// Status that was "set".
    pub status: StatusKind,
    /// Service version.
    pub version: String,
    /// Deployment environment.
    pub environment: String,
    /// Client-supplied data.
    #[schema(value_type = Object)]
    pub custom_data: Map<String, Value>,
    /// The validated request parameters as received.
    #[schema(value_type = Object)]
    pub request_params: Map<String, Value>,
}

/// Current runtime status of the process.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeStatus {
    /// Always `running`.
    pub status: String,
    /// Seconds since start.
    pub uptime: f64,
    /// Memory usage at sampling time.
    pub memory: MemoryUsage,
    /// Service version.
    pub version: String,
}

impl RuntimeStatus {
    /// Build from a fresh metrics sample.
    pub fn from_snapshot(snapshot: &ProcessSnapshot, version: &str) -> Self {
        Self {
            status: "running".to_string(),
            uptime: snapshot.uptime_secs(),
            memory: snapshot.memory,
            version: version.to_string(),
        }
    }
}

/// Outcome of `test_with_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Always true on success.
    pub processed: bool,
    /// Input keys in request order.
    pub input_keys: Vec<String>,
    /// Number of input keys.
    pub input_count: usize,
}

impl TestResult {
    /// Summarize an input object.
    pub fn from_input(input: &Map<String, Value>) -> Self {
        let input_keys: Vec<String> = input.keys().cloned().collect();
        Self {
            processed: true,
            input_count: input_keys.len(),
            input_keys,
        }
    }
}

/// Overall health state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthState {
    /// Every check passed.
    Healthy,
    /// At least one check failed.
    Unhealthy,
}

/// Individual liveness checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    /// Resident memory below the configured limit.
    pub memory_ok: bool,
    /// Uptime strictly positive.
    pub uptime_ok: bool,
}

/// Result of a health evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthReport {
    /// Summary state.
    pub status: HealthState,
    /// `memory_ok && uptime_ok`.
    pub healthy: bool,
    /// The individual checks.
    pub checks: HealthChecks,
}

impl HealthReport {
    /// Evaluate the liveness checks against a metrics sample.
    pub fn evaluate(snapshot: &ProcessSnapshot, memory_limit_bytes: u64) -> Self {
        let checks = HealthChecks {
            memory_ok: snapshot.memory.rss < memory_limit_bytes,
            uptime_ok: !snapshot.uptime.is_zero(),
        };
        let healthy = checks.memory_ok && checks.uptime_ok;

        Self {
            status: if healthy {
                HealthState::Healthy
            } else {
                HealthState::Unhealthy
            },
            healthy,
            checks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::time::Duration;

    use crate::process::{FixedProcessMetrics, ProcessMetrics};

    const LIMIT: u64 = 100 * 1024 * 1024;

    #[test]
    fn status_kind_names_are_lowercase() {
        assert_eq!(StatusKind::VARIANTS, &["active", "inactive", "maintenance"]);
        assert_eq!(StatusKind::from_str("maintenance").unwrap(), StatusKind::Maintenance);
        assert_eq!(StatusKind::Inactive.to_string(), "inactive");
    }

    #[test]
    fn test_result_keeps_key_order() {
        let input = serde_json::json!({"name": "Al", "email": "a@b.com"});
        let result = TestResult::from_input(input.as_object().unwrap());

        assert_eq!(result.input_keys, vec!["name", "email"]);
        assert_eq!(result.input_count, 2);
        assert!(result.processed);
    }

    #[test]
    fn health_passes_below_limit() {
        let snapshot = FixedProcessMetrics::healthy().sample().unwrap();
        let report = HealthReport::evaluate(&snapshot, LIMIT);

        assert!(report.healthy);
        assert_eq!(report.status, HealthState::Healthy);
    }

    #[test]
    fn health_fails_at_limit() {
        let snapshot = FixedProcessMetrics::new(Duration::from_secs(1), LIMIT)
            .sample()
            .unwrap();
        let report = HealthReport::evaluate(&snapshot, LIMIT);

        assert!(!report.checks.memory_ok);
        assert!(report.checks.uptime_ok);
        assert!(!report.healthy);
    }

    #[test]
    fn health_fails_with_zero_uptime() {
        let snapshot = FixedProcessMetrics::new(Duration::ZERO, 1024).sample().unwrap();
        let report = HealthReport::evaluate(&snapshot, LIMIT);

        assert!(!report.checks.uptime_ok);
        assert_eq!(report.status, HealthState::Unhealthy);
    }
}
