//! Route table
//!
//! ```text
//! standard ─┬─ GET  /ping
//!           ├─ dynamic ──┬─ GET /, /about, /snippet/view/{id}
//!           │            └─ GET+POST /user/signup, /user/login
//!           └─ protected ┬─ POST /user/logout
//!                        ├─ GET+POST /snippet/create
//!                        └─ GET /account/view, GET+POST /account/password/update
//! ```
//!
//! Unknown paths and known paths with an unregistered method both answer
//! 404, without touching the session.

use axum::{
    http::StatusCode,
    middleware::map_response,
    response::Response,
    routing::{get, post, MethodRouter},
    Router,
};

use crate::error::status_response;
use crate::handlers;
use crate::middleware::Chain;
use crate::state::AppState;

/// Build the complete application router.
pub fn routes(state: AppState) -> Router {
    let dynamic = |route: MethodRouter<AppState>| Chain::dynamic().then(route, &state);
    let protected = |route: MethodRouter<AppState>| Chain::protected().then(route, &state);

    let pages = Router::new()
        .route("/", dynamic(get(handlers::home)))
        .route("/about", dynamic(get(handlers::about)))
        .route(
            "/user/signup",
            dynamic(get(handlers::signup).post(handlers::signup_post)),
        )
        .route(
            "/user/login",
            dynamic(get(handlers::login).post(handlers::login_post)),
        )
        .route("/snippet/view/{id}", dynamic(get(handlers::snippet_view)))
        .route("/user/logout", protected(post(handlers::logout_post)))
        .route(
            "/snippet/create",
            protected(get(handlers::snippet_create).post(handlers::snippet_create_post)),
        )
        .route("/account/view", protected(get(handlers::account_view)))
        .route(
            "/account/password/update",
            protected(get(handlers::password_update).post(handlers::password_update_post)),
        )
        .with_state(state.clone());

    let mux = Router::new()
        .route("/ping", get(handlers::ping))
        .merge(pages)
        .fallback(handlers::not_found)
        .layer(map_response(method_not_allowed_as_not_found));

    Chain::standard().then(mux, &state)
}

async fn method_not_allowed_as_not_found(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return status_response(StatusCode::NOT_FOUND);
    }
    response
}
