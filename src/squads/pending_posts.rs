//! Moderation queue of posts submitted to a squad.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::context::ClientContext;
use crate::graphql::{self, request, Connection, GraphqlClient, Operation};
use crate::query::{
    generate_query_key, InfiniteData, InfiniteQuery, InfiniteQueryOptions, PageFetcher,
    QueryResult, RequestKey, Result, StaleTime,
};

pub const SQUAD_PENDING_POSTS_QUERY: &str = r#"
query SquadPendingPosts($sourceId: ID!, $status: [String], $after: String, $first: Int) {
  sourcePostModerations(sourceId: $sourceId, status: $status, after: $after, first: $first) {
    pageInfo { hasNextPage endCursor }
    edges {
      node {
        id status createdAt updatedAt title content image
        rejectionReason moderatorMessage
      }
    }
  }
}"#;

/// Moderation state of a submitted post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePostModerationStatus {
    Pending,
    Approved,
    Rejected,
}

/// A post awaiting (or past) squad moderation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePostModeration {
    pub id: String,
    pub status: SourcePostModerationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub moderator_message: Option<String>,
}

/// Drop pages without edges.
///
/// The API paginator can end with an empty page while still reporting more
/// pages. Only the exposed view is filtered; cursors come from the cached
/// pages.
pub fn select_non_empty_pages<T>(data: InfiniteData<Connection<T>>) -> InfiniteData<Connection<T>> {
    let (pages, page_params) = data
        .pages
        .into_iter()
        .zip(data.page_params)
        .filter(|(page, _)| !page.is_empty())
        .unzip();

    InfiniteData { pages, page_params }
}

struct PendingPostsPage {
    graphql: Arc<dyn GraphqlClient>,
    squad_id: String,
    status: Vec<SourcePostModerationStatus>,
}

#[async_trait]
impl PageFetcher<SourcePostModeration> for PendingPostsPage {
    async fn fetch_page(
        &self,
        cursor: Option<String>,
    ) -> graphql::Result<Connection<SourcePostModeration>> {
        let operation = Operation::query(
            SQUAD_PENDING_POSTS_QUERY,
            json!({
                "sourceId": self.squad_id,
                "status": self.status,
                "after": cursor,
            }),
        );
        request(self.graphql.as_ref(), operation, "sourcePostModerations").await
    }
}

/// Paginated moderation queue of one squad, filtered by status.
pub struct SquadPendingPosts {
    query: InfiniteQuery<SourcePostModeration>,
}

impl SquadPendingPosts {
    /// Queue of posts still pending review.
    pub fn new(ctx: &ClientContext, squad_id: &str) -> Self {
        Self::with_status(ctx, squad_id, vec![SourcePostModerationStatus::Pending])
    }

    /// Queue of posts in any of `status`.
    pub fn with_status(
        ctx: &ClientContext,
        squad_id: &str,
        status: Vec<SourcePostModerationStatus>,
    ) -> Self {
        let key = generate_query_key(RequestKey::SquadPostRequests, ctx.user(), &[squad_id]);
        let fetcher = Arc::new(PendingPostsPage {
            graphql: ctx.graphql.clone(),
            squad_id: squad_id.to_string(),
            status,
        });
        let options = InfiniteQueryOptions {
            enabled: !squad_id.is_empty(),
            stale_time: StaleTime::Default,
            initial_page_param: Some(String::new()),
        };

        Self {
            query: InfiniteQuery::new(ctx.queries.clone(), key, fetcher, options),
        }
    }

    /// Load the queue; empty pages are left out of the result.
    pub async fn fetch(&self) -> Result<QueryResult<InfiniteData<Connection<SourcePostModeration>>>> {
        Ok(self.query.fetch().await?.map(select_non_empty_pages))
    }

    /// Load one more page; empty pages are left out of the result.
    pub async fn fetch_next_page(
        &self,
    ) -> Result<QueryResult<InfiniteData<Connection<SourcePostModeration>>>> {
        Ok(self.query.fetch_next_page().await?.map(select_non_empty_pages))
    }

    /// Cached queue without empty pages.
    pub async fn data(&self) -> Result<Option<InfiniteData<Connection<SourcePostModeration>>>> {
        Ok(self.query.data().await?.map(select_non_empty_pages))
    }

    /// Cached queue exactly as fetched.
    pub async fn raw_data(&self) -> Result<Option<InfiniteData<Connection<SourcePostModeration>>>> {
        self.query.data().await
    }

    /// Whether the server reports more pages, judged on unfiltered data.
    pub async fn has_next_page(&self) -> Result<bool> {
        self.query.has_next_page().await
    }
}
