//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the application
///
/// Every variant maps to a status code and a canonical reason phrase. The
/// detail carried by server-side variants is logged, never sent to the client.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Session load, save or value (de)serialization failed
    #[error("Session error: {0}")]
    Session(String),

    /// Template lookup or rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// Storage collaborator error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Password hashing error
    #[error("Password hashing error: {0}")]
    Password(String),

    /// Resource not found, including malformed identifiers
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client input could not be understood
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Status code this error is reported with
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) | Error::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Error::NotFound(msg) => tracing::debug!("Not found: {}", msg),
            Error::BadRequest(msg) => tracing::debug!("Bad request: {}", msg),
            Error::Store(StoreError::NotFound) => tracing::debug!("Record not found"),
            other => tracing::error!(error = %other, "Request failed"),
        }

        status_response(status)
    }
}

/// Plain-text response carrying only the canonical reason phrase
pub fn status_response(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Unknown Status");
    (status, reason.to_string()).into_response()
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(err: tower_sessions::session::Error) -> Self {
        Error::Session(err.to_string())
    }
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        Error::Template(err.to_string())
    }
}
