//! The user's custom feeds.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::context::ClientContext;
use crate::graphql::{request, Connection, Edge, Operation};
use crate::labels::GENERIC_ERROR;
use crate::query::{generate_query_key, QueryKey, QueryResult, RequestKey, Result, StaleTime};

pub const FEED_LIST_QUERY: &str = r#"
query FeedList($after: String, $first: Int) {
  feedList(after: $after, first: $first) {
    pageInfo { hasNextPage endCursor }
    edges { node { id userId slug flags { name } } }
  }
}"#;

pub const CREATE_FEED_MUTATION: &str = r#"
mutation CreateFeed($name: String!) {
  createFeed(name: $name) {
    id userId slug flags { name }
  }
}"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedFlags {
    #[serde(default)]
    pub name: Option<String>,
}

/// A custom feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub flags: Option<FeedFlags>,
}

impl Feed {
    /// Display name; a missing or empty name falls back to the id.
    pub fn display_name(&self) -> String {
        self.flags
            .as_ref()
            .and_then(|flags| flags.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Feed {}", self.id))
    }

    /// Web app path of the feed.
    pub fn path(&self) -> String {
        format!("/feeds/{}", self.slug)
    }
}

/// Cache key of the feed list for the context's user.
pub fn feed_list_key(ctx: &ClientContext) -> QueryKey {
    generate_query_key(RequestKey::Feeds, ctx.user(), &[])
}

/// The signed-in user's feed list. Disabled for anonymous users.
pub struct FeedList {
    ctx: ClientContext,
    key: QueryKey,
}

impl FeedList {
    pub fn new(ctx: &ClientContext) -> Self {
        Self {
            ctx: ctx.clone(),
            key: feed_list_key(ctx),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ctx.user.is_some()
    }

    pub async fn fetch(&self) -> Result<QueryResult<Connection<Feed>>> {
        if !self.is_enabled() {
            return Ok(QueryResult::unfetched());
        }

        let graphql = self.ctx.graphql.clone();
        let feeds = self
            .ctx
            .queries
            .fetch_query(&self.key, StaleTime::OneHour, || async move {
                request::<Connection<Feed>>(
                    graphql.as_ref(),
                    Operation::query(FEED_LIST_QUERY, json!({})),
                    "feedList",
                )
                .await
            })
            .await?;

        Ok(QueryResult::fetched(feeds))
    }

    /// Cached feed list.
    pub async fn data(&self) -> Result<Option<Connection<Feed>>> {
        self.ctx.queries.get_query_data(&self.key).await
    }
}

/// Create a feed named `name`.
///
/// On success the feed is appended to the cached feed list. Failures show
/// the generic error toast and yield `None`.
pub async fn create_feed(ctx: &ClientContext, name: &str) -> Option<Feed> {
    let operation = Operation::mutation(CREATE_FEED_MUTATION, json!({ "name": name }));

    match request::<Feed>(ctx.graphql.as_ref(), operation, "createFeed").await {
        Ok(feed) => {
            info!(feed_id = %feed.id, slug = %feed.slug, "Feed created");
            let node = feed.clone();
            ctx.queries
                .set_query_data::<Connection<Feed>, _>(&feed_list_key(ctx), move |current| {
                    let mut list = current.unwrap_or_default();
                    list.edges.push(Edge { node });
                    list
                })
                .await;
            Some(feed)
        }
        Err(e) => {
            warn!(error = %e, "Feed creation failed");
            ctx.toaster.display_toast(GENERIC_ERROR);
            None
        }
    }
}
