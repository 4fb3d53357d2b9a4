//! CSRF (Cross-Site Request Forgery) protection.
//!
//! # How it works
//!
//! 1. [`csrf_guard`] makes sure the session holds a token on every request
//!    that passes through it, generating one on first contact
//! 2. The token is put in the request extensions, where the [`CsrfToken`]
//!    extractor and the render context pick it up
//! 3. Forms echo it back in the hidden `csrf_token` field; scripted clients
//!    may send the `X-CSRF-Token` header instead
//! 4. On POST/PUT/PATCH/DELETE the guard compares the submitted token with
//!    the session's in constant time and answers 400 on any mismatch, before
//!    the handler runs
//!
//! There is one token per session. It is not rotated per request, so a page
//! opened in two tabs can submit from either.

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use rand::Rng;
use tower_sessions::Session;

use super::config::CsrfConfig;
use crate::error::{status_response, Error};
use crate::form::is_form_request;
use crate::state::AppState;

const CSRF_SESSION_KEY: &str = "_csrf_token";

/// The session's CSRF token as seen by the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl CsrfToken {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self(token)
    }

    /// Get the raw token string.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Generate a new random alphanumeric token.
    #[must_use]
    pub fn generate(length: usize) -> Self {
        let token: String = rand::rng()
            .sample_iter(&rand::distr::Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Token currently stored in the session, if any.
    pub async fn from_session(session: &Session) -> Result<Option<Self>, Error> {
        Ok(session.get::<String>(CSRF_SESSION_KEY).await?.map(Self))
    }

    /// Get or create a CSRF token from the session.
    pub async fn get_or_create(session: &Session, length: usize) -> Result<Self, Error> {
        if let Some(token) = Self::from_session(session).await? {
            return Ok(token);
        }

        let token = Self::generate(length);
        session.insert(CSRF_SESSION_KEY, &token.0).await?;

        Ok(token)
    }
}

impl std::fmt::Display for CsrfToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CsrfToken>().cloned().ok_or_else(|| {
            Error::Internal("CSRF token missing from request extensions".to_string())
        })
    }
}

/// CSRF middleware for the dynamic chain.
///
/// Must run inside the session layer. Use with
/// `axum::middleware::from_fn_with_state`.
pub async fn csrf_guard(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let config = &state.config().session.csrf;

    let (token, mut request) = if !config.enabled || config.is_safe_method(request.method()) {
        match CsrfToken::get_or_create(&session, config.token_length).await {
            Ok(token) => (token, request),
            Err(e) => return e.into_response(),
        }
    } else {
        match verify_submission(&session, config, request, state.body_limit()).await {
            Ok(verified) => verified,
            Err(response) => return response,
        }
    };

    request.extensions_mut().insert(token);
    next.run(request).await
}

/// Check the submitted token of an unsafe request.
///
/// Returns the token and the request, with its body restored when it had to
/// be read to find the form field.
async fn verify_submission(
    session: &Session,
    config: &CsrfConfig,
    request: Request,
    body_limit: usize,
) -> Result<(CsrfToken, Request), Response> {
    let expected = match CsrfToken::from_session(session).await {
        Ok(Some(token)) => token,
        Ok(None) => {
            tracing::warn!(uri = %request.uri(), "CSRF validation failed: no token in session");
            return Err(csrf_failure());
        }
        Err(e) => return Err(e.into_response()),
    };

    let header_token = request
        .headers()
        .get(config.header_name.as_str())
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let (provided, request) = match header_token {
        Some(token) => (Some(token), request),
        None if is_form_request(&request) => {
            let (parts, body) = request.into_parts();
            let bytes = to_bytes(body, body_limit).await.map_err(|e| {
                tracing::warn!("CSRF validation failed: unreadable body: {}", e);
                csrf_failure()
            })?;
            let token = form_field(&bytes, &config.form_field_name);
            (token, Request::from_parts(parts, Body::from(bytes)))
        }
        None => (None, request),
    };

    let Some(provided) = provided else {
        tracing::warn!(uri = %request.uri(), "CSRF validation failed: no token provided");
        return Err(csrf_failure());
    };

    if !constant_time_compare(expected.token(), &provided) {
        tracing::warn!(uri = %request.uri(), "CSRF validation failed: token mismatch");
        return Err(csrf_failure());
    }

    Ok((expected, request))
}

/// First value of `name` in an URL-encoded body.
fn form_field(body: &[u8], name: &str) -> Option<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

fn csrf_failure() -> Response {
    status_response(StatusCode::BAD_REQUEST)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
