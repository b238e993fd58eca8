//! Infinite (cursor-paginated) queries.
//!
//! Pages are fetched lazily: `fetch` loads the first page, each
//! `fetch_next_page` appends one page using the cursor reported by the
//! previous one. The whole page list lives in the cache under a single key.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::{QueryClient, Result};
use super::{QueryKey, StaleTime};
use crate::graphql::{self, get_next_page_param, Connection};

/// Ordered pages of an infinite query plus the cursor each was fetched with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfiniteData<P> {
    pub pages: Vec<P>,
    pub page_params: Vec<Option<String>>,
}

impl<P> Default for InfiniteData<P> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            page_params: Vec::new(),
        }
    }
}

impl<T> InfiniteData<Connection<T>> {
    /// All nodes across pages, in page order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|page| page.nodes())
    }

    pub fn last_page(&self) -> Option<&Connection<T>> {
        self.pages.last()
    }

    /// Cursor for the next page, if the last page reports one.
    pub fn next_page_param(&self) -> Option<String> {
        get_next_page_param(self.last_page().map(|page| &page.page_info))
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page_param().is_some()
    }

    fn push_page(&mut self, param: Option<String>, page: Connection<T>) {
        self.page_params.push(param);
        self.pages.push(page);
    }
}

/// Outcome of a query read.
///
/// A disabled query yields `data: None, is_fetched: false`; that is not an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<D> {
    pub data: Option<D>,
    pub is_fetched: bool,
}

impl<D> QueryResult<D> {
    pub fn unfetched() -> Self {
        Self {
            data: None,
            is_fetched: false,
        }
    }

    pub fn fetched(data: D) -> Self {
        Self {
            data: Some(data),
            is_fetched: true,
        }
    }

    pub fn map<E>(self, f: impl FnOnce(D) -> E) -> QueryResult<E> {
        QueryResult {
            data: self.data.map(f),
            is_fetched: self.is_fetched,
        }
    }
}

/// Fetches one page of a paginated list.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch_page(&self, cursor: Option<String>) -> graphql::Result<Connection<T>>;
}

/// Behaviour switches of an infinite query.
#[derive(Debug, Clone)]
pub struct InfiniteQueryOptions {
    /// When false nothing is fetched.
    pub enabled: bool,
    pub stale_time: StaleTime,
    /// Cursor sent with the first page.
    pub initial_page_param: Option<String>,
}

impl Default for InfiniteQueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_time: StaleTime::Default,
            initial_page_param: None,
        }
    }
}

/// A cached, lazily paginated query.
pub struct InfiniteQuery<T> {
    client: QueryClient,
    key: QueryKey,
    fetcher: Arc<dyn PageFetcher<T>>,
    options: InfiniteQueryOptions,
}

impl<T> InfiniteQuery<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    pub fn new(
        client: QueryClient,
        key: QueryKey,
        fetcher: Arc<dyn PageFetcher<T>>,
        options: InfiniteQueryOptions,
    ) -> Self {
        Self {
            client,
            key,
            fetcher,
            options,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    /// Cached pages, without touching the network.
    pub async fn data(&self) -> Result<Option<InfiniteData<Connection<T>>>> {
        self.client.get_query_data(&self.key).await
    }

    /// True once pages have been fetched into the cache.
    pub async fn is_fetched(&self) -> Result<bool> {
        Ok(self.data().await?.is_some())
    }

    /// True if the cached last page reports another page.
    pub async fn has_next_page(&self) -> Result<bool> {
        Ok(self
            .data()
            .await?
            .map(|data| data.has_next_page())
            .unwrap_or(false))
    }

    /// Load the query.
    ///
    /// Fresh cached pages are returned as is. Stale pages are refetched in
    /// order, up to the number previously loaded. With no cache entry the
    /// first page is fetched.
    pub async fn fetch(&self) -> Result<QueryResult<InfiniteData<Connection<T>>>> {
        if !self.options.enabled {
            return Ok(QueryResult::unfetched());
        }

        let _guard = self.client.lock_key(&self.key).await;
        self.load().await.map(QueryResult::fetched)
    }

    /// Fetch the page after the last cached one.
    ///
    /// Loads the query first if nothing is cached. Returns the cached data
    /// unchanged when the server reports no further pages.
    pub async fn fetch_next_page(&self) -> Result<QueryResult<InfiniteData<Connection<T>>>> {
        if !self.options.enabled {
            return Ok(QueryResult::unfetched());
        }

        let _guard = self.client.lock_key(&self.key).await;

        let current = match self
            .client
            .get_query_data::<InfiniteData<Connection<T>>>(&self.key)
            .await?
        {
            Some(data) => data,
            None => return self.load().await.map(QueryResult::fetched),
        };

        let cursor = match current.next_page_param() {
            Some(cursor) => cursor,
            None => return Ok(QueryResult::fetched(current)),
        };

        debug!(key = %self.key, cursor = %cursor, "Fetching next page");
        let page = self.fetcher.fetch_page(Some(cursor.clone())).await?;

        let mut data = current;
        data.push_page(Some(cursor), page);
        self.store(data.clone()).await;
        Ok(QueryResult::fetched(data))
    }

    /// Fresh data, or refetch. Caller holds the key lock.
    async fn load(&self) -> Result<InfiniteData<Connection<T>>> {
        if let Some(data) = self
            .client
            .get_fresh_query_data(&self.key, self.options.stale_time)
            .await?
        {
            debug!(key = %self.key, "Infinite query cache hit");
            return Ok(data);
        }

        let page_count = self
            .client
            .get_query_data::<InfiniteData<Connection<T>>>(&self.key)
            .await
            .ok()
            .flatten()
            .map(|data| data.pages.len())
            .unwrap_or(0)
            .max(1);

        let mut data = InfiniteData::default();
        let mut cursor = self.options.initial_page_param.clone();
        for _ in 0..page_count {
            debug!(key = %self.key, cursor = ?cursor, "Fetching page");
            let page = self.fetcher.fetch_page(cursor.clone()).await?;
            data.push_page(cursor, page);
            cursor = data.next_page_param();
            if cursor.is_none() {
                break;
            }
        }

        self.store(data.clone()).await;
        Ok(data)
    }

    async fn store(&self, data: InfiniteData<Connection<T>>) {
        self.client
            .set_query_data::<InfiniteData<Connection<T>>, _>(&self.key, move |_| data)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Mutex;

    use super::*;
    use crate::graphql::{GraphqlError, PageInfo};
    use crate::query::{generate_query_key, RequestKey};

    /// Serves pages from a fixed list; the cursor is the page index.
    struct ListFetcher {
        pages: Vec<Vec<&'static str>>,
        requested: Mutex<Vec<Option<String>>>,
    }

    impl ListFetcher {
        fn new(pages: Vec<Vec<&'static str>>) -> Arc<Self> {
            Arc::new(Self {
                pages,
                requested: Mutex::new(Vec::new()),
            })
        }

        async fn requested(&self) -> Vec<Option<String>> {
            self.requested.lock().await.clone()
        }
    }

    #[async_trait]
    impl PageFetcher<String> for ListFetcher {
        async fn fetch_page(&self, cursor: Option<String>) -> graphql::Result<Connection<String>> {
            self.requested.lock().await.push(cursor.clone());
            let index = cursor
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|c| c.parse::<usize>().unwrap())
                .unwrap_or(0);
            let items = self.pages.get(index).ok_or(GraphqlError::EmptyResponse)?;
            let has_next_page = index + 1 < self.pages.len();
            Ok(Connection::new(
                items.iter().map(|s| s.to_string()).collect(),
                PageInfo {
                    has_next_page,
                    end_cursor: Some((index + 1).to_string()),
                },
            ))
        }
    }

    fn query(fetcher: Arc<ListFetcher>, options: InfiniteQueryOptions) -> InfiniteQuery<String> {
        InfiniteQuery::new(
            QueryClient::in_memory(),
            generate_query_key(RequestKey::SquadPostRequests, None, &["s1"]),
            fetcher,
            options,
        )
    }

    fn nodes(data: &InfiniteData<Connection<String>>) -> Vec<&str> {
        data.nodes().map(String::as_str).collect()
    }

    #[tokio::test]
    async fn test_disabled_query_never_fetches() {
        let fetcher = ListFetcher::new(vec![vec!["a"]]);
        let q = query(
            fetcher.clone(),
            InfiniteQueryOptions {
                enabled: false,
                ..Default::default()
            },
        );

        assert_eq!(q.fetch().await.unwrap(), QueryResult::unfetched());
        assert_eq!(q.fetch_next_page().await.unwrap(), QueryResult::unfetched());
        assert!(fetcher.requested().await.is_empty());
        assert!(q.data().await.unwrap().is_none());
        assert!(!q.is_fetched().await.unwrap());
    }

    #[tokio::test]
    async fn test_pages_load_one_at_a_time() {
        let fetcher = ListFetcher::new(vec![vec!["a", "b"], vec!["c"], vec!["d"]]);
        let q = query(fetcher.clone(), InfiniteQueryOptions::default());

        let first = q.fetch().await.unwrap();
        assert!(first.is_fetched);
        assert_eq!(nodes(first.data.as_ref().unwrap()), vec!["a", "b"]);
        assert!(q.has_next_page().await.unwrap());

        let second = q.fetch_next_page().await.unwrap().data.unwrap();
        assert_eq!(nodes(&second), vec!["a", "b", "c"]);

        let third = q.fetch_next_page().await.unwrap().data.unwrap();
        assert_eq!(nodes(&third), vec!["a", "b", "c", "d"]);
        assert!(!q.has_next_page().await.unwrap());
        assert_eq!(
            third.page_params,
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );

        // No more pages: nothing is requested.
        q.fetch_next_page().await.unwrap();
        assert_eq!(fetcher.requested().await.len(), 3);
    }

    #[tokio::test]
    async fn test_next_page_without_cache_loads_first_page() {
        let fetcher = ListFetcher::new(vec![vec!["a"], vec!["b"]]);
        let q = query(fetcher.clone(), InfiniteQueryOptions::default());

        let data = q.fetch_next_page().await.unwrap().data.unwrap();
        assert_eq!(nodes(&data), vec!["a"]);
        assert_eq!(fetcher.requested().await, vec![None]);
    }

    #[tokio::test]
    async fn test_initial_page_param_is_sent() {
        let fetcher = ListFetcher::new(vec![vec!["a"]]);
        let q = query(
            fetcher.clone(),
            InfiniteQueryOptions {
                initial_page_param: Some(String::new()),
                ..Default::default()
            },
        );

        q.fetch().await.unwrap();
        assert_eq!(fetcher.requested().await, vec![Some(String::new())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_cache_is_reused_and_stale_cache_refetches_all_pages() {
        let fetcher = ListFetcher::new(vec![vec!["a"], vec!["b"], vec!["c"]]);
        let q = query(fetcher.clone(), InfiniteQueryOptions::default());

        q.fetch().await.unwrap();
        q.fetch_next_page().await.unwrap();
        q.fetch().await.unwrap();
        assert_eq!(fetcher.requested().await.len(), 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        let data = q.fetch().await.unwrap().data.unwrap();
        assert_eq!(nodes(&data), vec!["a", "b"]);
        assert_eq!(
            fetcher.requested().await,
            vec![None, Some("1".to_string()), None, Some("1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_concurrent_next_page_requests_are_sequential() {
        let fetcher = ListFetcher::new(vec![vec!["a"], vec!["b"], vec!["c"]]);
        let q = query(fetcher.clone(), InfiniteQueryOptions::default());
        q.fetch().await.unwrap();

        let (left, right) = futures::join!(q.fetch_next_page(), q.fetch_next_page());
        left.unwrap();
        right.unwrap();

        let data = q.data().await.unwrap().unwrap();
        assert_eq!(nodes(&data), vec!["a", "b", "c"]);
        assert_eq!(
            fetcher.requested().await,
            vec![None, Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fetch_error_is_returned() {
        let fetcher = ListFetcher::new(vec![]);
        let q = query(fetcher, InfiniteQueryOptions::default());

        assert!(q.fetch().await.is_err());
        assert!(q.data().await.unwrap().is_none());
    }
}
