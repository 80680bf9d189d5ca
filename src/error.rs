//! Unified error types for the status board.

use axum::http::StatusCode;
use thiserror::Error;

/// Unified error type for startup and CLI operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration was loaded but is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Template compilation or rendering error.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Input rejected by a schema.
///
/// `message` is derived from the first violated constraint and is what
/// clients see in the `error` field of a 400 response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Offending field, or `value` when the whole input is wrong.
    pub field: String,
    /// Human readable description.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure to sample process metrics.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// The platform has no supported metrics source.
    #[error("process metrics are not supported on {0}")]
    Unsupported(&'static str),

    /// Reading the metrics source failed.
    #[error("failed to read process metrics: {0}")]
    ReadFailed(String),

    /// A field was missing from the metrics source.
    #[error("process metric {0} is unavailable")]
    MissingField(&'static str),
}

/// Errors raised inside status service operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Input failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Input had the wrong shape for the operation.
    #[error("{0}")]
    InvalidInput(String),

    /// Process metrics could not be sampled.
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Unexpected failure while processing.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status for this error outside of the health check.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::Metrics(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        let err = ServiceError::from(ValidationError::new("name", "\"name\" is required"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.is_client_error());

        let err = ServiceError::InvalidInput("Test data must be an object".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_map_to_500() {
        let err = ServiceError::from(MetricsError::Unsupported("windows"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.is_client_error());
    }

    #[test]
    fn validation_error_displays_message_only() {
        let err = ValidationError::new("age", "\"age\" must be an integer");
        assert_eq!(err.to_string(), "\"age\" must be an integer");
    }
}
