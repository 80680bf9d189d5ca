//! Status board: a small diagnostic HTTP service.
//!
//! Serves liveness and health checks, a validated data echo, process
//! runtime status, and a handful of server-rendered dashboard pages.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`process`]: Process uptime and memory sampling
//! - [`validation`]: Declarative request schemas
//! - [`service`]: Status operations and the response envelope
//! - [`views`]: Page view models and template rendering
//! - [`api`]: HTTP routes, handlers and OpenAPI document
//! - [`probe`]: Health check client for running instances
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod probe;
pub mod process;
pub mod service;
pub mod utils;
pub mod validation;
pub mod views;

pub use config::Config;
pub use error::{AppError, Result};
