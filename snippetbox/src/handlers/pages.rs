//! Static and listing pages

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::{status_response, Result};
use crate::state::AppState;
use crate::templates::PageContext;

/// Liveness check outside the session machinery
pub async fn ping() -> &'static str {
    "OK"
}

/// Latest snippets
pub async fn home(State(state): State<AppState>, page: PageContext) -> Result<Response> {
    let snippets = state
        .snippets()
        .latest(state.config().snippets.latest_limit)
        .await?;

    let data = page.template_data().await?.with_snippets(snippets);
    state.templates().render(StatusCode::OK, "home.html", &data)
}

pub async fn about(State(state): State<AppState>, page: PageContext) -> Result<Response> {
    let data = page.template_data().await?;
    state.templates().render(StatusCode::OK, "about.html", &data)
}

/// Fallback for unknown paths and methods
pub async fn not_found() -> impl IntoResponse {
    status_response(StatusCode::NOT_FOUND)
}
