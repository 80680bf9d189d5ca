//! HTML page handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use super::handlers::AppState;
use crate::error::ServiceError;
use crate::metrics;
use crate::views::pages;
use crate::views::{ErrorView, Page};

/// Render `view` with the page's template, or the error page on failure.
fn render_page<T: Serialize>(state: &AppState, page: Page, view: Result<T, ServiceError>) -> Response {
    let _timer = metrics::timer_page_render(page.name());

    let html = view
        .map_err(|e| e.to_string())
        .and_then(|view| {
            state
                .views
                .render(page.template(), &view)
                .map_err(|e| e.to_string())
        });

    match html {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(page = page.name(), error = %err, "Failed to render page");
            render_error(state, page, &err)
        }
    }
}

fn render_error(state: &AppState, page: Page, err: &str) -> Response {
    let view = ErrorView::for_page(page, err);
    match state.views.render("error.html", &view) {
        Ok(html) => (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, page.failure_message()).into_response(),
    }
}

/// `/`
pub async fn home(State(state): State<AppState>) -> Response {
    let view = pages::summary(Page::Home, &state.service);
    render_page(&state, Page::Home, view)
}

/// `/dashboard`
pub async fn dashboard(State(state): State<AppState>) -> Response {
    let view = pages::dashboard(&state.service);
    render_page(&state, Page::Dashboard, view)
}

/// `/test`
pub async fn api_test(State(state): State<AppState>) -> Response {
    let view = pages::api_test(&state.service);
    render_page(&state, Page::ApiTest, Ok(view))
}

/// `/status`
pub async fn status(State(state): State<AppState>) -> Response {
    let view = pages::status(&state.service);
    render_page(&state, Page::Status, view)
}

/// `/admin`
pub async fn admin(State(state): State<AppState>) -> Response {
    let view = pages::summary(Page::Admin, &state.service);
    render_page(&state, Page::Admin, view)
}

/// `/login`
pub async fn login(State(state): State<AppState>) -> Response {
    let view = pages::login(&state.service);
    render_page(&state, Page::Login, Ok(view))
}
