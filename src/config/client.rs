//! GraphQL client configuration types.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Default GraphQL endpoint for local development.
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "http://localhost:5000/graphql";
/// Default web application base URL for local development.
pub const DEFAULT_WEBAPP_URL: &str = "http://localhost:5002/";

/// GraphQL endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphqlConfig {
    /// Full URL of the GraphQL endpoint.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries for transient query failures. Mutations are never retried.
    pub max_retries: usize,
    /// Extra headers sent with every request.
    pub headers: BTreeMap<String, String>,
}

impl Default for GraphqlConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            headers: BTreeMap::new(),
        }
    }
}
