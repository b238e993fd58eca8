//! Bootstrap utilities for feedline binaries.
//!
//! Shared initialization: tracing and collaborator wiring.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LOG_ENV_VAR};
use crate::context::ClientContext;
use crate::graphql::{GraphqlError, HttpGraphqlClient, HttpGraphqlConfig};
use crate::notify::TracingToaster;
use crate::query::QueryClient;

/// Initialize tracing with FEEDLINE_LOG environment variable.
///
/// Defaults to "info" level if FEEDLINE_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build a client context from configuration.
///
/// Uses the HTTP transport, an in-memory query cache and log-only toasts.
pub fn build_context(config: &Config) -> Result<ClientContext, GraphqlError> {
    let graphql = HttpGraphqlClient::new(HttpGraphqlConfig::from(&config.graphql))?;
    info!(endpoint = %graphql.endpoint(), "GraphQL client ready");

    Ok(ClientContext::new(
        Arc::new(graphql),
        QueryClient::in_memory(),
        Arc::new(TracingToaster),
    ))
}
