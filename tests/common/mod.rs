//! Shared fixtures for integration tests.

use std::sync::Arc;

use feedline::graphql::MockGraphqlClient;
use feedline::notify::RecordingToaster;
use feedline::query::QueryClient;
use feedline::{ClientContext, LoggedUser};
use serde_json::{json, Value};

pub struct Harness {
    pub graphql: Arc<MockGraphqlClient>,
    pub toaster: Arc<RecordingToaster>,
    pub ctx: ClientContext,
}

impl Harness {
    pub fn new() -> Self {
        let graphql = Arc::new(MockGraphqlClient::new());
        let toaster = Arc::new(RecordingToaster::new());
        let ctx = ClientContext::new(graphql.clone(), QueryClient::in_memory(), toaster.clone())
            .with_user(LoggedUser::new("user-1"));
        Self {
            graphql,
            toaster,
            ctx,
        }
    }

    pub fn anonymous() -> Self {
        let mut harness = Self::new();
        harness.ctx.user = None;
        harness
    }
}

/// A `Connection` JSON page.
pub fn page(nodes: Vec<Value>, has_next_page: bool, end_cursor: &str) -> Value {
    json!({
        "edges": nodes.into_iter().map(|node| json!({ "node": node })).collect::<Vec<_>>(),
        "pageInfo": { "hasNextPage": has_next_page, "endCursor": end_cursor },
    })
}
