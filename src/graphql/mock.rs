//! Mock GraphQL transport for testing.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ApiError, GraphqlClient, GraphqlError, Operation, Result};

/// Scripted response of the mock transport.
enum MockResponse {
    Data(serde_json::Value),
    Errors(Vec<ApiError>),
}

/// Mock transport that replays scripted responses in order and records
/// every operation it receives.
#[derive(Default)]
pub struct MockGraphqlClient {
    responses: RwLock<VecDeque<MockResponse>>,
    executed: RwLock<Vec<Operation>>,
}

impl MockGraphqlClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response carrying `data`.
    pub async fn push_data(&self, data: serde_json::Value) {
        self.responses
            .write()
            .await
            .push_back(MockResponse::Data(data));
    }

    /// Queue a response whose `errors` array has a single entry with `message`.
    pub async fn push_error(&self, message: impl Into<String>) {
        self.responses
            .write()
            .await
            .push_back(MockResponse::Errors(vec![ApiError::new(message)]));
    }

    /// Queue a response with an arbitrary `errors` array.
    pub async fn push_errors(&self, errors: Vec<ApiError>) {
        self.responses
            .write()
            .await
            .push_back(MockResponse::Errors(errors));
    }

    pub async fn executed_count(&self) -> usize {
        self.executed.read().await.len()
    }

    pub async fn executed(&self) -> Vec<Operation> {
        self.executed.read().await.clone()
    }
}

#[async_trait]
impl GraphqlClient for MockGraphqlClient {
    async fn execute(&self, operation: Operation) -> Result<serde_json::Value> {
        self.executed.write().await.push(operation);
        match self.responses.write().await.pop_front() {
            Some(MockResponse::Data(data)) => Ok(data),
            Some(MockResponse::Errors(errors)) => Err(GraphqlError::Api(errors)),
            None => Err(GraphqlError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let client = MockGraphqlClient::new();
        client.push_data(json!({ "n": 1 })).await;
        client.push_error("boom").await;

        let op = Operation::query("query { n }", json!({}));
        assert_eq!(client.execute(op.clone()).await.unwrap(), json!({ "n": 1 }));

        let err = client.execute(op.clone()).await.unwrap_err();
        assert_eq!(err.first_api_message(), Some("boom"));

        assert!(matches!(
            client.execute(op).await,
            Err(GraphqlError::EmptyResponse)
        ));
        assert_eq!(client.executed_count().await, 3);
    }
}
