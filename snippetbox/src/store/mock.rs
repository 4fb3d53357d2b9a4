//! Test doubles with fixed fixtures
//!
//! Snippet 1 always exists, `dupe@example.com` is always taken and
//! `alice@example.com` / `pa$$word` authenticates as user 1.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Snippet, SnippetStore, StoreError, StoreResult, User, UserStore};

pub const MOCK_SNIPPET_CONTENT: &str = "An old silent pond...";
pub const MOCK_EMAIL: &str = "alice@example.com";
pub const MOCK_PASSWORD: &str = "pa$$word";
pub const DUPLICATE_EMAIL: &str = "dupe@example.com";

fn mock_snippet() -> Snippet {
    Snippet {
        id: 1,
        title: "An old silent pond".to_string(),
        content: MOCK_SNIPPET_CONTENT.to_string(),
        created: Utc.with_ymd_and_hms(2022, 1, 1, 10, 0, 0).unwrap(),
        expires: Utc.with_ymd_and_hms(2032, 1, 1, 10, 0, 0).unwrap(),
    }
}

/// Counts inserts so tests can assert that a rejected request had no effect
#[derive(Default)]
pub struct MockSnippetStore {
    inserts: AtomicUsize,
}

impl MockSnippetStore {
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnippetStore for MockSnippetStore {
    async fn insert(&self, _title: &str, _content: &str, _expires_days: u32) -> StoreResult<i64> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(2)
    }

    async fn get(&self, id: i64) -> StoreResult<Snippet> {
        match id {
            1 => Ok(mock_snippet()),
            _ => Err(StoreError::NotFound),
        }
    }

    async fn latest(&self, _limit: usize) -> StoreResult<Vec<Snippet>> {
        Ok(vec![mock_snippet()])
    }
}

#[derive(Default)]
pub struct MockUserStore;

#[async_trait]
impl UserStore for MockUserStore {
    async fn insert(&self, _name: &str, email: &str, _password: &str) -> StoreResult<()> {
        match email {
            DUPLICATE_EMAIL => Err(StoreError::DuplicateEmail),
            _ => Ok(()),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<i64> {
        if email == MOCK_EMAIL && password == MOCK_PASSWORD {
            Ok(1)
        } else {
            Err(StoreError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: i64) -> StoreResult<bool> {
        Ok(id == 1)
    }

    async fn get(&self, id: i64) -> StoreResult<User> {
        match id {
            1 => Ok(User {
                id: 1,
                name: "Alice".to_string(),
                email: MOCK_EMAIL.to_string(),
                created: Utc.with_ymd_and_hms(2022, 1, 1, 10, 0, 0).unwrap(),
            }),
            _ => Err(StoreError::NotFound),
        }
    }

    async fn update_password(
        &self,
        id: i64,
        current_password: &str,
        _new_password: &str,
    ) -> StoreResult<()> {
        match (id, current_password) {
            (1, MOCK_PASSWORD) => Ok(()),
            (1, _) => Err(StoreError::InvalidCredentials),
            _ => Err(StoreError::NotFound),
        }
    }
}
