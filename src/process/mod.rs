//! Process metrics sampling.
//!
//! This module handles:
//! - The [`ProcessMetrics`] provider interface
//! - Live sampling from the operating system
//! - A fixed provider for tests

pub mod live;
pub mod mock;

use std::fmt::Debug;
use std::time::Duration;

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::MetricsError;

pub use live::LiveProcessMetrics;
pub use mock::FixedProcessMetrics;

const MIB: u64 = 1024 * 1024;

/// Memory usage of the current process, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    /// Resident set size.
    pub rss: u64,
    /// Peak resident set size since start.
    pub peak_rss: u64,
    /// Virtual memory size.
    pub virtual_size: u64,
}

impl MemoryUsage {
    /// Resident set size rounded to whole MiB.
    pub fn rss_mib(&self) -> u64 {
        to_mib(self.rss)
    }

    /// Peak resident set size rounded to whole MiB.
    pub fn peak_rss_mib(&self) -> u64 {
        to_mib(self.peak_rss)
    }

    /// Virtual size rounded to whole MiB.
    pub fn virtual_size_mib(&self) -> u64 {
        to_mib(self.virtual_size)
    }
}

fn to_mib(bytes: u64) -> u64 {
    (bytes + MIB / 2) / MIB
}

/// One sample of process metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSnapshot {
    /// Time since the process started serving.
    pub uptime: Duration,
    /// Memory usage at sampling time.
    pub memory: MemoryUsage,
}

impl ProcessSnapshot {
    /// Uptime in fractional seconds.
    pub fn uptime_secs(&self) -> f64 {
        self.uptime.as_secs_f64()
    }
}

/// Source of process metrics.
///
/// Every call samples fresh values; implementations must not cache.
pub trait ProcessMetrics: Send + Sync + Debug {
    /// Sample uptime and memory usage.
    fn sample(&self) -> Result<ProcessSnapshot, MetricsError>;
}
