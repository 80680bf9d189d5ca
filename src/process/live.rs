//! Live process metrics read from the operating system.

use std::time::Instant;

use tracing::trace;

use super::{MemoryUsage, ProcessMetrics, ProcessSnapshot};
use crate::error::MetricsError;

/// Samples the running process.
///
/// Uptime is measured from construction, so build one at startup.
#[derive(Debug, Clone)]
pub struct LiveProcessMetrics {
    started: Instant,
}

impl LiveProcessMetrics {
    /// Create a provider whose uptime starts now.
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for LiveProcessMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessMetrics for LiveProcessMetrics {
    fn sample(&self) -> Result<ProcessSnapshot, MetricsError> {
        let memory = read_memory()?;
        let uptime = self.started.elapsed();

        trace!(rss = memory.rss, uptime_ms = uptime.as_millis() as u64, "Sampled process metrics");

        Ok(ProcessSnapshot { uptime, memory })
    }
}

#[cfg(target_os = "linux")]
fn read_memory() -> Result<MemoryUsage, MetricsError> {
    let process = procfs::process::Process::myself()
        .map_err(|e| MetricsError::ReadFailed(e.to_string()))?;
    let status = process
        .status()
        .map_err(|e| MetricsError::ReadFailed(e.to_string()))?;

    // /proc/self/status reports kB
    let rss_kb = status.vmrss.ok_or(MetricsError::MissingField("VmRSS"))?;
    let peak_kb = status.vmhwm.unwrap_or(rss_kb);
    let virtual_kb = status.vmsize.ok_or(MetricsError::MissingField("VmSize"))?;

    Ok(MemoryUsage {
        rss: rss_kb * 1024,
        peak_rss: peak_kb * 1024,
        virtual_size: virtual_kb * 1024,
    })
}

#[cfg(not(target_os = "linux"))]
fn read_memory() -> Result<MemoryUsage, MetricsError> {
    Err(MetricsError::Unsupported(std::env::consts::OS))
}
