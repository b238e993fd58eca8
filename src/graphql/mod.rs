//! GraphQL transport.
//!
//! Hooks never talk HTTP directly. They build an [`Operation`] and hand it
//! to a [`GraphqlClient`], which makes the transport swappable: the
//! reqwest-backed [`HttpGraphqlClient`] in production and
//! [`MockGraphqlClient`] in tests.

mod error;
mod http;
pub mod mock;
mod types;

pub use error::{ApiError, GraphqlError, Result};
pub use http::{HttpGraphqlClient, HttpGraphqlConfig};
pub use mock::MockGraphqlClient;
pub use types::{get_next_page_param, Connection, Edge, PageInfo};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Whether an operation reads or writes.
///
/// Transports may retry queries; mutations are sent at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A GraphQL document plus its variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    #[serde(skip)]
    pub kind: OperationKind,
    pub query: &'static str,
    pub variables: serde_json::Value,
}

impl Operation {
    pub fn query(query: &'static str, variables: serde_json::Value) -> Self {
        Self {
            kind: OperationKind::Query,
            query,
            variables,
        }
    }

    pub fn mutation(query: &'static str, variables: serde_json::Value) -> Self {
        Self {
            kind: OperationKind::Mutation,
            query,
            variables,
        }
    }
}

/// Transport for GraphQL operations.
///
/// Implementations return the `data` object of a successful response, or
/// [`GraphqlError::Api`] when the server reports errors.
#[async_trait]
pub trait GraphqlClient: Send + Sync {
    async fn execute(&self, operation: Operation) -> Result<serde_json::Value>;
}

/// Execute `operation` and decode the field `field` of the response data.
pub async fn request<T: DeserializeOwned>(
    client: &dyn GraphqlClient,
    operation: Operation,
    field: &str,
) -> Result<T> {
    let mut data = client.execute(operation).await?;
    let value = data
        .get_mut(field)
        .map(serde_json::Value::take)
        .ok_or(GraphqlError::EmptyResponse)?;
    Ok(serde_json::from_value(value)?)
}
