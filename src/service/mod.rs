//! Status service layer.
//!
//! This module handles:
//! - The response envelope every operation returns
//! - Status, runtime, test and health records
//! - The stateless status operations

pub mod envelope;
pub mod status;
pub mod types;

pub use envelope::{Envelope, LegacyPayload, Payload, PayloadData};
pub use status::StatusService;
pub use types::{
    HealthChecks, HealthReport, HealthState, RuntimeStatus, SetStatusParams, StatusKind,
    StatusRecord, TestResult,
};
