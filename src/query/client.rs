//! Typed facade over a [`QueryCache`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, warn};

use super::cache::{updater, InMemoryQueryCache, QueryCache};
use super::{QueryKey, StaleTime};
use crate::graphql::GraphqlError;

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors surfaced by the query layer.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The remote fetch failed.
    #[error("fetch failed: {0}")]
    Fetch(#[from] GraphqlError),

    /// Cached data could not be decoded into the requested type.
    #[error("cached data for {key} is not decodable: {source}")]
    Decode {
        key: QueryKey,
        #[source]
        source: serde_json::Error,
    },

    /// Fetched data could not be encoded for the cache.
    #[error("failed to encode data for {key}: {source}")]
    Encode {
        key: QueryKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Typed access to the shared query cache.
///
/// Cloning is cheap; clones share the same cache and the same per-key fetch
/// locks.
#[derive(Clone)]
pub struct QueryClient {
    cache: Arc<dyn QueryCache>,
    fetch_locks: FetchLocks,
}

type FetchLocks = Arc<StdMutex<HashMap<QueryKey, Arc<Mutex<()>>>>>;

/// Holds the fetch lock of one key.
///
/// On drop the key's table entry is removed unless another caller still
/// holds or awaits it.
pub(crate) struct KeyLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: QueryKey,
    locks: FetchLocks,
}

impl Drop for KeyLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.key);
        }
    }
}

impl QueryClient {
    pub fn new(cache: Arc<dyn QueryCache>) -> Self {
        Self {
            cache,
            fetch_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Client backed by a fresh [`InMemoryQueryCache`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryQueryCache::new()))
    }

    pub fn cache(&self) -> &Arc<dyn QueryCache> {
        &self.cache
    }

    /// Serialize fetches for `key`.
    ///
    /// Held for the duration of a fetch so that page requests for one key
    /// run strictly one after another. Different keys never contend.
    pub(crate) async fn lock_key(&self, key: &QueryKey) -> KeyLockGuard {
        let lock = self
            .fetch_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_default()
            .clone();

        KeyLockGuard {
            guard: Some(lock.lock_owned().await),
            key: key.clone(),
            locks: self.fetch_locks.clone(),
        }
    }

    /// Number of keys with a fetch in flight or queued.
    pub(crate) fn active_fetch_locks(&self) -> usize {
        self.fetch_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Decoded data for `key`, fresh or stale.
    pub async fn get_query_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>> {
        match self.cache.get(key).await {
            Some(entry) => serde_json::from_value(entry.value)
                .map(Some)
                .map_err(|source| QueryError::Decode {
                    key: key.clone(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Decoded data for `key` if it is still within `stale_time`.
    pub async fn get_fresh_query_data<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
        stale_time: StaleTime,
    ) -> Result<Option<T>> {
        match self.cache.get(key).await {
            Some(entry) if !entry.is_stale(stale_time.duration()) => {
                serde_json::from_value(entry.value)
                    .map(Some)
                    .map_err(|source| QueryError::Decode {
                        key: key.clone(),
                        source,
                    })
            }
            _ => Ok(None),
        }
    }

    /// Atomically replace the data for `key` with `update(current)`.
    ///
    /// Undecodable current data is passed as `None`.
    pub async fn set_query_data<T, F>(&self, key: &QueryKey, update: F)
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce(Option<T>) -> T + Send + 'static,
    {
        let log_key = key.clone();
        self.cache
            .set(
                key,
                updater(move |current| {
                    let current = current.and_then(|value| {
                        serde_json::from_value::<T>(value.clone())
                            .map_err(|e| {
                                warn!(key = %log_key, error = %e, "Discarding undecodable cache entry");
                            })
                            .ok()
                    });
                    match serde_json::to_value(update(current)) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            error!(key = %log_key, error = %e, "Failed to encode cache entry");
                            None
                        }
                    }
                }),
            )
            .await;
    }

    /// Mark `key` stale so the next fetch goes to the server.
    pub async fn invalidate_queries(&self, key: &QueryKey) {
        if self.cache.invalidate(key).await {
            debug!(key = %key, "Invalidated query");
        }
    }

    /// Drop the cached data for `key`.
    pub async fn remove_queries(&self, key: &QueryKey) {
        self.cache.remove(key).await;
        debug!(key = %key, "Removed query");
    }

    /// Return fresh cached data for `key`, or run `fetcher` and cache its
    /// result.
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: &QueryKey,
        stale_time: StaleTime,
        fetcher: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, GraphqlError>>,
    {
        let _guard = self.lock_key(key).await;

        if let Some(data) = self.get_fresh_query_data::<T>(key, stale_time).await? {
            debug!(key = %key, "Query cache hit");
            return Ok(data);
        }

        debug!(key = %key, "Fetching query");
        let data = fetcher().await?;
        let value = serde_json::to_value(&data).map_err(|source| QueryError::Encode {
            key: key.clone(),
            source,
        })?;
        self.cache.set(key, updater(move |_| Some(value))).await;
        Ok(data)
    }
}
