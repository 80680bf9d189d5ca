//! Server-rendered dashboard pages.

pub mod pages;
pub mod renderer;

pub use pages::{ErrorView, Page, API_ENDPOINTS};
pub use renderer::ViewRenderer;
