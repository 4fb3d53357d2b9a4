//! Authentication stages

use axum::{
    extract::{Request, State},
    http::{header::CACHE_CONTROL, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::Result;
use crate::session::auth::{self, AuthContext, AUTHENTICATED_USER_ID_KEY};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/user/login";

/// Derive the [`AuthContext`] for this request and put it in the extensions.
///
/// A session naming a user the store no longer knows is treated as
/// anonymous and the stale id is dropped.
pub async fn authenticate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let auth = match resolve(&state, &session).await {
        Ok(auth) => auth,
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(auth);
    next.run(request).await
}

async fn resolve(state: &AppState, session: &Session) -> Result<AuthContext> {
    let Some(user_id) = auth::authenticated_user_id(session).await? else {
        return Ok(AuthContext::anonymous());
    };

    if state.users().exists(user_id).await? {
        Ok(AuthContext::authenticated(user_id))
    } else {
        tracing::info!(user_id, "Session refers to unknown user, treating as anonymous");
        session.remove::<i64>(AUTHENTICATED_USER_ID_KEY).await?;
        Ok(AuthContext::anonymous())
    }
}

/// Send anonymous visitors to the login page.
///
/// For GET and HEAD the requested path is remembered so that a successful
/// login can return there. Authenticated responses are marked
/// `Cache-Control: no-store` so that pages behind login are not cached.
pub async fn require_authentication(
    auth: AuthContext,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    if !auth.is_authenticated() {
        if matches!(*request.method(), Method::GET | Method::HEAD) {
            if let Err(e) = auth::remember_redirect(&session, request.uri().path()).await {
                return e.into_response();
            }
        }
        return Redirect::to(LOGIN_PATH).into_response();
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
