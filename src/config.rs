//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment name reported by the status endpoints.
    #[serde(default = "default_app_env")]
    pub app_env: String,

    // === Service Identity ===
    /// Name reported in the `service` field of every response.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Version reported by the status endpoints.
    #[serde(default = "default_app_version")]
    pub app_version: String,

    // === Behaviour ===
    /// Artificial processing delay for set_status, in milliseconds.
    #[serde(default = "default_set_status_delay_ms")]
    pub set_status_delay_ms: u64,

    /// Resident memory limit for the health check, in MiB.
    #[serde(default = "default_health_memory_limit_mb")]
    pub health_memory_limit_mb: u64,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_port() -> u16 {
    3000
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_service_name() -> String {
    "StatusService".to_string()
}

fn default_app_version() -> String {
    "1.0.0".to_string()
}

fn default_set_status_delay_ms() -> u64 {
    100
}

fn default_health_memory_limit_mb() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Upper bound for the artificial set_status delay.
const MAX_SET_STATUS_DELAY_MS: u64 = 10_000;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            app_env: default_app_env(),
            service_name: default_service_name(),
            app_version: default_app_version(),
            set_status_delay_ms: default_set_status_delay_ms(),
            health_memory_limit_mb: default_health_memory_limit_mb(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be greater than 0".to_string());
        }

        if self.app_env.trim().is_empty() {
            return Err("APP_ENV must not be empty".to_string());
        }

        if self.service_name.trim().is_empty() {
            return Err("SERVICE_NAME must not be empty".to_string());
        }

        if self.health_memory_limit_mb == 0 {
            return Err("HEALTH_MEMORY_LIMIT_MB must be greater than 0".to_string());
        }

        if self.set_status_delay_ms > MAX_SET_STATUS_DELAY_MS {
            return Err(format!(
                "SET_STATUS_DELAY_MS must be at most {}",
                MAX_SET_STATUS_DELAY_MS
            ));
        }

        Ok(())
    }

    /// Artificial set_status delay as a duration.
    pub fn set_status_delay(&self) -> Duration {
        Duration::from_millis(self.set_status_delay_ms)
    }

    /// Health check memory limit in bytes.
    pub fn health_memory_limit_bytes(&self) -> u64 {
        self.health_memory_limit_mb * 1024 * 1024
    }
}
