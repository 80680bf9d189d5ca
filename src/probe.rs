//! Client for the health check endpoint of a running instance.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::Result;

/// Path of the health check relative to the base URL.
pub const HEALTH_PATH: &str = "/api/test/health";

/// Outcome of a single probe.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Decoded response envelope.
    pub body: Value,
}

impl ProbeOutcome {
    /// Whether the instance reported itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status.is_success() && self.body["health"]["healthy"].as_bool().unwrap_or(false)
    }
}

/// HTTP client probing a status board instance.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    http: reqwest::Client,
    base_url: String,
}

impl HealthProbe {
    /// Create a probe for the instance at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Full URL of the health check.
    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), HEALTH_PATH)
    }

    /// Run the health check once.
    ///
    /// A 503 is a valid answer, not an error; only transport and decoding
    /// failures are returned as `Err`.
    #[instrument(skip(self), fields(url = %self.health_url()))]
    pub async fn check(&self) -> Result<ProbeOutcome> {
        let response = self.http.get(self.health_url()).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;

        debug!(status = status.as_u16(), "Probe response received");
        Ok(ProbeOutcome { status, body })
    }
}
