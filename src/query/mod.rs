//! Client-side query cache.
//!
//! Query results are cached under structured [`QueryKey`]s in an injectable
//! [`QueryCache`]. [`QueryClient`] adds typed access and TTL-aware fetching,
//! [`InfiniteQuery`] layers cursor pagination on top.

mod cache;
mod client;
mod infinite;
mod key;

pub use cache::{updater, CacheEntry, InMemoryQueryCache, QueryCache, Updater};
pub use client::{QueryClient, QueryError, Result};
pub use infinite::{InfiniteData, InfiniteQuery, InfiniteQueryOptions, PageFetcher, QueryResult};
pub use key::{generate_query_key, QueryKey, RequestKey, StaleTime, ANONYMOUS_USER};
