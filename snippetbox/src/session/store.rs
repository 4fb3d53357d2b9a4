//! In-memory session store with expiry.
//!
//! Records live in a shared map. An expired record is never handed back to
//! the session layer, and [`spawn_expired_deletion`] drops expired records
//! from the map on a fixed period so abandoned sessions do not pile up.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tower_sessions::{
    session::{Id, Record},
    session_store::{self, ExpiredDeletion, SessionStore},
};

/// Shared in-memory session records; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore(Arc<Mutex<HashMap<Id, Record>>>);

impl MemorySessionStore {
    /// Number of stored records, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.0.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.0.lock().await.is_empty()
    }
}

fn is_live(record: &Record, now: OffsetDateTime) -> bool {
    record.expiry_date > now
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut records = self.0.lock().await;
        while records.contains_key(&record.id) {
            record.id = Id::default();
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.0.lock().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let mut records = self.0.lock().await;
        match records.get(session_id) {
            Some(record) if is_live(record, OffsetDateTime::now_utc()) => {
                Ok(Some(record.clone()))
            }
            Some(_) => {
                records.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.0.lock().await.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MemorySessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = OffsetDateTime::now_utc();
        self.0.lock().await.retain(|_, record| is_live(record, now));
        Ok(())
    }
}

/// Purge expired records every `period` until the handle is aborted.
pub fn spawn_expired_deletion(store: MemorySessionStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match store.delete_expired().await {
                Ok(()) => {
                    let remaining = store.len().await;
                    tracing::debug!(remaining, "Expired sessions purged")
                }
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
            }
        }
    })
}
