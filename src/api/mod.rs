//! HTTP API module: JSON status endpoints, HTML pages, metrics and docs.

pub mod docs;
pub mod handlers;
pub mod pages;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_router, serve};
