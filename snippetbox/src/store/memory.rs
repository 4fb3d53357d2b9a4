//! In-memory stores used by the binary
//!
//! Both stores keep their rows behind a `tokio::sync::RwLock`. Password
//! hashing runs on the blocking pool because Argon2id is deliberately slow.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Snippet, SnippetStore, StoreError, StoreResult, User, UserStore};
use crate::auth::PasswordHasher;

/// Snippets keyed by id
#[derive(Default)]
pub struct MemorySnippetStore {
    rows: RwLock<BTreeMap<i64, Snippet>>,
}

impl MemorySnippetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnippetStore for MemorySnippetStore {
    async fn insert(&self, title: &str, content: &str, expires_days: u32) -> StoreResult<i64> {
        let mut rows = self.rows.write().await;
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let created = Utc::now();

        rows.insert(
            id,
            Snippet {
                id,
                title: title.to_string(),
                content: content.to_string(),
                created,
                expires: created + Duration::days(i64::from(expires_days)),
            },
        );

        Ok(id)
    }

    async fn get(&self, id: i64) -> StoreResult<Snippet> {
        let now = Utc::now();
        self.rows
            .read()
            .await
            .get(&id)
            .filter(|snippet| snippet.expires > now)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn latest(&self, limit: usize) -> StoreResult<Vec<Snippet>> {
        let now = Utc::now();
        Ok(self
            .rows
            .read()
            .await
            .values()
            .rev()
            .filter(|snippet| snippet.expires > now)
            .take(limit)
            .cloned()
            .collect())
    }
}

struct UserRow {
    user: User,
    hashed_password: String,
}

/// Users keyed by id; e-mail addresses are unique
pub struct MemoryUserStore {
    rows: RwLock<BTreeMap<i64, UserRow>>,
    hasher: PasswordHasher,
}

impl MemoryUserStore {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            hasher,
        }
    }

    async fn hash(&self, password: &str) -> StoreResult<String> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| StoreError::Backend(format!("hashing task failed: {}", e)))?
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> StoreResult<bool> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| StoreError::Backend(format!("verification task failed: {}", e)))?
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, name: &str, email: &str, password: &str) -> StoreResult<()> {
        let hashed_password = self.hash(password).await?;

        let mut rows = self.rows.write().await;
        if rows.values().any(|row| row.user.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        rows.insert(
            id,
            UserRow {
                user: User {
                    id,
                    name: name.to_string(),
                    email: email.to_string(),
                    created: Utc::now(),
                },
                hashed_password,
            },
        );

        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<i64> {
        let found = self
            .rows
            .read()
            .await
            .values()
            .find(|row| row.user.email == email)
            .map(|row| (row.user.id, row.hashed_password.clone()));

        let Some((id, hashed_password)) = found else {
            return Err(StoreError::InvalidCredentials);
        };

        if self.verify(password, &hashed_password).await? {
            Ok(id)
        } else {
            Err(StoreError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: i64) -> StoreResult<bool> {
        Ok(self.rows.read().await.contains_key(&id))
    }

    async fn get(&self, id: i64) -> StoreResult<User> {
        self.rows
            .read()
            .await
            .get(&id)
            .map(|row| row.user.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn update_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> StoreResult<()> {
        let current_hash = self
            .rows
            .read()
            .await
            .get(&id)
            .map(|row| row.hashed_password.clone())
            .ok_or(StoreError::NotFound)?;

        if !self.verify(current_password, &current_hash).await? {
            return Err(StoreError::InvalidCredentials);
        }

        let new_hash = self.hash(new_password).await?;
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        row.hashed_password = new_hash;

        Ok(())
    }
}
