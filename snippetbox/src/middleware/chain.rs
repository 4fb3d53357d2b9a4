//! Named middleware chains
//!
//! ```text
//! standard   recover_panic -> log_request -> security_headers
//! dynamic    session_load_save -> csrf_guard -> authenticate
//! protected  dynamic -> require_authentication
//! ```
//!
//! The standard chain wraps the whole router, fallback included. The dynamic
//! and protected chains wrap each page's `MethodRouter`, so only registered
//! methods reach them; a request for an unknown path or method never creates
//! a session.

use axum::middleware;

use super::{
    apply_security_headers, authenticate, log_request, recover_panic_layer,
    require_authentication, Layered,
};
use crate::session::{self, csrf_guard};
use crate::state::AppState;

/// One request-processing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RecoverPanic,
    LogRequest,
    SecurityHeaders,
    SessionLoadSave,
    CsrfGuard,
    Authenticate,
    RequireAuthentication,
}

impl Stage {
    /// Wrap `target` in this stage.
    pub fn wrap<T: Layered>(self, target: T, state: &AppState) -> T {
        match self {
            Stage::RecoverPanic => target.with_layer(recover_panic_layer()),
            Stage::LogRequest => target.with_layer(middleware::from_fn(log_request)),
            Stage::SecurityHeaders => {
                apply_security_headers(target, &state.config().security_headers)
            }
            Stage::SessionLoadSave => session::apply_session_layer(
                target,
                &state.config().session,
                state.session_store(),
                state.session_key(),
            ),
            Stage::CsrfGuard => {
                target.with_layer(middleware::from_fn_with_state(state.clone(), csrf_guard))
            }
            Stage::Authenticate => {
                target.with_layer(middleware::from_fn_with_state(state.clone(), authenticate))
            }
            Stage::RequireAuthentication => {
                target.with_layer(middleware::from_fn(require_authentication))
            }
        }
    }
}

/// Ordered list of stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    stages: Vec<Stage>,
}

impl Chain {
    pub fn new(stages: impl IntoIterator<Item = Stage>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// Applied to every response, including 404s and `/ping`.
    pub fn standard() -> Self {
        Self::new([Stage::RecoverPanic, Stage::LogRequest, Stage::SecurityHeaders])
    }

    /// Pages that use the session.
    pub fn dynamic() -> Self {
        Self::new([Stage::SessionLoadSave, Stage::CsrfGuard, Stage::Authenticate])
    }

    /// Pages that need a logged-in user.
    pub fn protected() -> Self {
        Self::dynamic().append(Stage::RequireAuthentication)
    }

    /// A new chain with `stage` running after all existing ones.
    #[must_use]
    pub fn append(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Wrap `target` in every stage.
    ///
    /// The last layer added is the outermost, so stages are added back to
    /// front.
    pub fn then<T: Layered>(&self, target: T, state: &AppState) -> T {
        self.stages
            .iter()
            .rev()
            .fold(target, |target, stage| stage.wrap(target, state))
    }
}
