//! Storage collaborators for snippets and users
//!
//! Handlers only see the [`SnippetStore`] and [`UserStore`] traits, held as
//! trait objects in [`AppState`](crate::state::AppState), so the in-memory
//! implementations and the test doubles are interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

pub mod memory;

#[cfg(test)]
pub mod mock;

pub use memory::{MemorySnippetStore, MemoryUserStore};

/// Domain-level storage failures
///
/// Handlers branch on the first three kinds; `Backend` is always a 500.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No matching record
    #[error("no matching record found")]
    NotFound,

    /// A user with this e-mail address already exists
    #[error("duplicate email")]
    DuplicateEmail,

    /// E-mail unknown or password wrong
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Anything the backend could not classify
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A stored snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// A registered user, without the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created: DateTime<Utc>,
}

#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Store a snippet that expires `expires_days` from now; returns its id
    async fn insert(&self, title: &str, content: &str, expires_days: u32) -> StoreResult<i64>;

    /// Fetch an unexpired snippet
    async fn get(&self, id: i64) -> StoreResult<Snippet>;

    /// Most recent unexpired snippets, newest first, at most `limit`
    async fn latest(&self, limit: usize) -> StoreResult<Vec<Snippet>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a user; `DuplicateEmail` when the address is taken
    async fn insert(&self, name: &str, email: &str, password: &str) -> StoreResult<()>;

    /// Check credentials and return the user id; `InvalidCredentials` otherwise
    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<i64>;

    async fn exists(&self, id: i64) -> StoreResult<bool>;

    async fn get(&self, id: i64) -> StoreResult<User>;

    /// Replace the password after checking the current one
    async fn update_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> StoreResult<()>;
}
