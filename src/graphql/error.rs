//! Errors returned by GraphQL transports.

use serde::{Deserialize, Serialize};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphqlError>;

/// A single entry of the `errors` array in a GraphQL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: None,
        }
    }
}

/// Errors that can occur when talking to the GraphQL API.
#[derive(Debug, thiserror::Error)]
pub enum GraphqlError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server answered with a GraphQL `errors` array.
    #[error("API error: {}", first_message(.0).unwrap_or("<no message>"))]
    Api(Vec<ApiError>),

    /// Non-success HTTP status without a GraphQL error body.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response carried neither `data` nor `errors`.
    #[error("empty response")]
    EmptyResponse,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn first_message(errors: &[ApiError]) -> Option<&str> {
    errors.first().map(|e| e.message.as_str())
}

impl GraphqlError {
    /// Message of the first GraphQL error entry, if the server returned any.
    pub fn first_api_message(&self) -> Option<&str> {
        match self {
            GraphqlError::Api(errors) => first_message(errors),
            _ => None,
        }
    }

    /// Returns true if retrying the request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GraphqlError::Http(e) => e.is_timeout() || e.is_connect(),
            GraphqlError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_api_message() {
        let err = GraphqlError::Api(vec![ApiError::new("first"), ApiError::new("second")]);
        assert_eq!(err.first_api_message(), Some("first"));
        assert_eq!(err.to_string(), "API error: first");
    }

    #[test]
    fn test_first_api_message_absent_for_other_errors() {
        let err = GraphqlError::EmptyResponse;
        assert_eq!(err.first_api_message(), None);
        assert_eq!(GraphqlError::Api(vec![]).first_api_message(), None);
    }

    #[test]
    fn test_transient_statuses() {
        let unavailable = GraphqlError::Status {
            status: 503,
            body: String::new(),
        };
        let rate_limited = GraphqlError::Status {
            status: 429,
            body: String::new(),
        };
        let forbidden = GraphqlError::Status {
            status: 403,
            body: String::new(),
        };

        assert!(unavailable.is_transient());
        assert!(rate_limited.is_transient());
        assert!(!forbidden.is_transient());
        assert!(!GraphqlError::Api(vec![ApiError::new("nope")]).is_transient());
    }
}
