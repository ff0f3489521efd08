use crate::core::{CacheEntry, KeyValueStore, Verification};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Verdict cache on top of a [`KeyValueStore`].
///
/// Store failures never reach the caller: a failed read is a miss and a
/// failed write is logged and dropped. Expired entries are ignored but left
/// in place for the store to compact.
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn get(&self, email: &str) -> Option<Verification> {
        match self.store.get(email).await {
            Ok(Some(entry)) if entry.is_live_at(Utc::now()) => Some(entry.verification),
            Ok(Some(_)) => {
                tracing::debug!("Cache entry for {} has expired", email);
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Cache check failed: {}", e);
                None
            }
        }
    }

    pub async fn put(&self, email: &str, verification: &Verification) {
        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let entry = CacheEntry {
            email: email.to_string(),
            verification: verification.clone(),
            expires_at: Utc::now().timestamp().saturating_add(ttl_secs),
        };

        if let Err(e) = self.store.put(entry).await {
            tracing::error!("Cache update failed: {}", e);
        }
    }
}
