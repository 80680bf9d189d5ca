//! Request validation.
//!
//! Schemas are data: each route declares its fields as
//! [`Constraint`]s and [`Schema::validate`] does the checking.

pub mod schema;

use once_cell::sync::Lazy;
use strum::VariantNames;

use crate::service::StatusKind;

pub use schema::{Constraint, FieldRule, Schema, UnknownKeys};

/// Longest accepted free-text message.
pub const MAX_MESSAGE_LEN: usize = 200;

/// Body of `set_status`: `{status?, message?, data?}`.
pub static SET_STATUS_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .optional("status", Constraint::OneOf(StatusKind::VARIANTS))
        .optional(
            "message",
            Constraint::Text {
                min: None,
                max: Some(MAX_MESSAGE_LEN),
            },
        )
        .optional("data", Constraint::Object)
});

/// Body of `test_data`: `{name?, email?, age?, data?, message?}`.
pub static TEST_DATA_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::new()
        .optional(
            "name",
            Constraint::Text {
                min: Some(2),
                max: Some(50),
            },
        )
        .optional("email", Constraint::Email)
        .optional(
            "age",
            Constraint::Integer {
                min: Some(0),
                max: Some(150),
            },
        )
        .optional("data", Constraint::Object)
        .optional(
            "message",
            Constraint::Text {
                min: None,
                max: Some(MAX_MESSAGE_LEN),
            },
        )
});
