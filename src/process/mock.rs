//! Fixed process metrics for unit testing.
//!
//! Returns the same snapshot on every call, or a configured failure, so
//! health and status results are deterministic.

use std::time::Duration;

use super::{MemoryUsage, ProcessMetrics, ProcessSnapshot};
use crate::error::MetricsError;

/// Process metrics provider with preset values.
#[derive(Debug, Clone)]
pub struct FixedProcessMetrics {
    snapshot: ProcessSnapshot,
    failure: Option<String>,
}

impl FixedProcessMetrics {
    /// Provider reporting `uptime` and `rss` bytes resident.
    pub fn new(uptime: Duration, rss: u64) -> Self {
        Self {
            snapshot: ProcessSnapshot {
                uptime,
                memory: MemoryUsage {
                    rss,
                    peak_rss: rss,
                    virtual_size: rss * 4,
                },
            },
            failure: None,
        }
    }

    /// A healthy-looking process: 42s uptime, 32 MiB resident.
    pub fn healthy() -> Self {
        Self::new(Duration::from_secs(42), 32 * 1024 * 1024)
    }

    /// Provider whose every sample fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::healthy()
        }
    }
}

impl Default for FixedProcessMetrics {
    fn default() -> Self {
        Self::healthy()
    }
}

impl ProcessMetrics for FixedProcessMetrics {
    fn sample(&self) -> Result<ProcessSnapshot, MetricsError> {
        match &self.failure {
            Some(reason) => Err(MetricsError::ReadFailed(reason.clone())),
            None => Ok(self.snapshot),
        }
    }
}
