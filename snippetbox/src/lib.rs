//! # snippetbox
//!
//! Server-rendered snippet sharing service built on axum.
//!
//! ## Features
//!
//! - **Middleware chains**: panic recovery, request logging and security headers
//!   for every response; signed sessions, CSRF protection and authentication
//!   for pages; login gating for protected pages
//! - **Templates**: minijinja pages compiled once at startup from embedded sources
//! - **Forms**: URL-encoded binding with validation errors rendered next to the
//!   user's input
//! - **Sessions**: in-memory store with periodic purge, inactivity expiry, id
//!   renewal on login and logout
//! - **Graceful shutdown**: SIGTERM and SIGINT drain in-flight requests
//!
//! ## Example
//!
//! ```rust,no_run
//! use snippetbox::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::builder().config(config.clone()).build()?;
//!
//!     Server::new(config).serve(routes(state)).await
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;
pub mod store;
pub mod templates;
pub mod validator;

#[cfg(test)]
mod test_utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::auth::{PasswordConfig, PasswordHasher};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::form::DecodedForm;
    pub use crate::middleware::{Chain, Stage};
    pub use crate::observability::init_tracing;
    pub use crate::routes::routes;
    pub use crate::server::Server;
    pub use crate::session::{AuthContext, CsrfToken, Flash, Session, SessionConfig};
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::store::{
        MemorySnippetStore, MemoryUserStore, Snippet, SnippetStore, StoreError, User, UserStore,
    };
    pub use crate::templates::{PageContext, TemplateCache, TemplateData};
    pub use crate::validator::Validator;

    pub use axum::response::Html;
}
