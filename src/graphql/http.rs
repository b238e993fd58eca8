//! HTTP transport for the GraphQL API.
//!
//! POSTs `{ query, variables }` JSON to the configured endpoint and unwraps
//! the `{ data, errors }` envelope.

use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{ApiError, GraphqlClient, GraphqlError, Operation, OperationKind, Result};
use crate::config::GraphqlConfig;

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpGraphqlConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Maximum retries for transient query failures.
    pub max_retries: usize,

    /// Additional headers to include (auth cookies, app version).
    pub headers: Vec<(String, String)>,
}

impl Default for HttpGraphqlConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            headers: Vec::new(),
        }
    }
}

impl HttpGraphqlConfig {
    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry budget for queries.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

impl From<&GraphqlConfig> for HttpGraphqlConfig {
    fn from(config: &GraphqlConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            headers: config
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Raw GraphQL response envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<ApiError>>,
}

/// GraphQL client over HTTP.
///
/// Queries are retried with backoff on transient failures; mutations are
/// sent exactly once.
pub struct HttpGraphqlClient {
    client: Client,
    config: HttpGraphqlConfig,
}

impl HttpGraphqlClient {
    /// Create a new client with the given configuration.
    pub fn new(config: HttpGraphqlConfig) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(GraphqlError::Config(
                "GraphQL endpoint not configured".to_string(),
            ));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Backoff configuration for retries.
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(5))
            .with_max_times(self.config.max_retries)
            .with_jitter()
    }

    /// Send one request and unwrap the response envelope.
    async fn post(&self, operation: &Operation) -> Result<serde_json::Value> {
        let mut request = self.client.post(&self.config.endpoint).json(operation);

        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error responses still carry a GraphQL envelope most of the time.
        let envelope = serde_json::from_str::<Envelope>(&body);

        match envelope {
            Ok(Envelope {
                errors: Some(errors),
                ..
            }) if !errors.is_empty() => {
                debug!(
                    endpoint = %self.config.endpoint,
                    status = %status,
                    error_count = errors.len(),
                    "GraphQL response carried errors"
                );
                Err(GraphqlError::Api(errors))
            }
            Ok(Envelope { data: Some(data), .. }) if status.is_success() => Ok(data),
            Ok(_) if status.is_success() => Err(GraphqlError::EmptyResponse),
            Err(e) if status.is_success() => Err(GraphqlError::Serialization(e)),
            _ => {
                warn!(
                    endpoint = %self.config.endpoint,
                    status = %status,
                    "GraphQL request failed"
                );
                Err(GraphqlError::Status {
                    status: status.as_u16(),
                    body: body.chars().take(200).collect(),
                })
            }
        }
    }
}

#[async_trait]
impl GraphqlClient for HttpGraphqlClient {
    async fn execute(&self, operation: Operation) -> Result<serde_json::Value> {
        match operation.kind {
            OperationKind::Mutation => self.post(&operation).await,
            OperationKind::Query => {
                (|| async { self.post(&operation).await })
                    .retry(self.backoff())
                    .when(GraphqlError::is_transient)
                    .notify(|err, delay| {
                        warn!(error = %err, ?delay, "Retrying GraphQL query");
                    })
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = HttpGraphqlConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = HttpGraphqlConfig::default()
            .with_endpoint("https://api.example.com/graphql")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0)
            .with_header("Authorization", "Bearer token");

        assert_eq!(config.endpoint, "https://api.example.com/graphql");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.headers.len(), 1);
    }

    #[test]
    fn test_new_requires_endpoint() {
        let result = HttpGraphqlClient::new(HttpGraphqlConfig::default());
        assert!(matches!(result, Err(GraphqlError::Config(_))));
    }

    #[test]
    fn test_from_graphql_config() {
        let mut source = GraphqlConfig::default();
        source.endpoint = "http://localhost:5000/graphql".to_string();
        source.timeout_secs = 7;
        source
            .headers
            .insert("x-app".to_string(), "feedline".to_string());

        let config = HttpGraphqlConfig::from(&source);
        assert_eq!(config.endpoint, "http://localhost:5000/graphql");
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(
            config.headers,
            vec![("x-app".to_string(), "feedline".to_string())]
        );
    }

    #[test]
    fn test_operation_body_omits_kind() {
        let op = Operation::mutation("mutation { x }", serde_json::json!({ "a": 1 }));
        let body = serde_json::to_value(&op).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "query": "mutation { x }", "variables": { "a": 1 } })
        );
    }
}
