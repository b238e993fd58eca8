//! Collaborators shared by every hook.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::graphql::GraphqlClient;
use crate::notify::Toaster;
use crate::query::QueryClient;

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl LoggedUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
        }
    }
}

/// Transport, cache, notifications and identity, injected into hooks.
#[derive(Clone)]
pub struct ClientContext {
    pub graphql: Arc<dyn GraphqlClient>,
    pub queries: QueryClient,
    pub toaster: Arc<dyn Toaster>,
    pub user: Option<LoggedUser>,
}

impl ClientContext {
    pub fn new(
        graphql: Arc<dyn GraphqlClient>,
        queries: QueryClient,
        toaster: Arc<dyn Toaster>,
    ) -> Self {
        Self {
            graphql,
            queries,
            toaster,
            user: None,
        }
    }

    /// Same collaborators, acting as `user`.
    pub fn with_user(mut self, user: LoggedUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn user(&self) -> Option<&LoggedUser> {
        self.user.as_ref()
    }
}
