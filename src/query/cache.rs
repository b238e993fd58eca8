//! Query cache storage.
//!
//! Values are stored as JSON so one store can hold every query's data.
//! The typed view lives in [`QueryClient`](super::QueryClient).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::QueryKey;

/// A cached query result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: serde_json::Value,
    pub updated_at: Instant,
    pub invalidated: bool,
}

impl CacheEntry {
    /// True once `stale_time` has elapsed or the entry was invalidated.
    pub fn is_stale(&self, stale_time: Duration) -> bool {
        self.invalidated || self.updated_at.elapsed() >= stale_time
    }
}

/// Read-modify-write function applied by [`QueryCache::set`].
///
/// Receives the current value (if any). Returning `None` leaves the entry
/// untouched.
pub type Updater =
    Box<dyn FnOnce(Option<&serde_json::Value>) -> Option<serde_json::Value> + Send>;

/// Box a closure as an [`Updater`].
pub fn updater<F>(f: F) -> Updater
where
    F: FnOnce(Option<&serde_json::Value>) -> Option<serde_json::Value> + Send + 'static,
{
    Box::new(f)
}

/// Key-value store backing the query client.
///
/// Implementations must apply `set` atomically: no other write to the same
/// key may interleave between reading the current value and storing the
/// updater's result.
#[async_trait]
pub trait QueryCache: Send + Sync {
    /// Current entry for `key`.
    async fn get(&self, key: &QueryKey) -> Option<CacheEntry>;

    /// Replace the value for `key` with the updater's result and reset its
    /// staleness.
    async fn set(&self, key: &QueryKey, updater: Updater);

    /// Mark `key` stale. Returns false if there was no entry.
    async fn invalidate(&self, key: &QueryKey) -> bool;

    /// Drop the entry for `key`.
    async fn remove(&self, key: &QueryKey);
}

/// In-process query cache.
#[derive(Default)]
pub struct InMemoryQueryCache {
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
}

impl InMemoryQueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl QueryCache for InMemoryQueryCache {
    async fn get(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &QueryKey, updater: Updater) {
        let mut entries = self.entries.write().await;
        let current = entries.get(key).map(|entry| &entry.value);
        if let Some(value) = updater(current) {
            entries.insert(
                key.clone(),
                CacheEntry {
                    value,
                    updated_at: Instant::now(),
                    invalidated: false,
                },
            );
        }
    }

    async fn invalidate(&self, key: &QueryKey) -> bool {
        match self.entries.write().await.get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        }
    }

    async fn remove(&self, key: &QueryKey) {
        self.entries.write().await.remove(key);
    }
}
