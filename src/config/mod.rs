//! Application configuration.
//!
//! Loaded from YAML files and `FEEDLINE__*` environment variables.

mod client;

pub use client::{GraphqlConfig, DEFAULT_GRAPHQL_ENDPOINT, DEFAULT_WEBAPP_URL};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "feedline.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "FEEDLINE_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "FEEDLINE";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "FEEDLINE_LOG";

use serde::Deserialize;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GraphQL API configuration.
    pub graphql: GraphqlConfig,
    /// Base URL of the web application, with trailing slash.
    pub webapp_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graphql: GraphqlConfig::default(),
            webapp_url: DEFAULT_WEBAPP_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `feedline.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.graphql.endpoint, DEFAULT_GRAPHQL_ENDPOINT);
        assert_eq!(config.graphql.timeout_secs, 30);
        assert_eq!(config.webapp_url, DEFAULT_WEBAPP_URL);
    }

    #[test]
    #[serial]
    fn test_load_from_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "graphql:\n  endpoint: https://api.example.com/graphql\n  max_retries: 1\n  headers:\n    x-app: feedline\nwebapp_url: https://app.example.com/"
        )
        .unwrap();

        let config = Config::load(file.path().to_str()).unwrap();
        assert_eq!(config.graphql.endpoint, "https://api.example.com/graphql");
        assert_eq!(config.graphql.max_retries, 1);
        assert_eq!(config.graphql.timeout_secs, 30);
        assert_eq!(
            config.graphql.headers.get("x-app").map(String::as_str),
            Some("feedline")
        );
        assert_eq!(config.webapp_url, "https://app.example.com/");
    }

    #[test]
    #[serial]
    fn test_env_overrides_defaults() {
        std::env::set_var("FEEDLINE__GRAPHQL__TIMEOUT_SECS", "5");
        let config = Config::load(None);
        std::env::remove_var("FEEDLINE__GRAPHQL__TIMEOUT_SECS");

        assert_eq!(config.unwrap().graphql.timeout_secs, 5);
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_error() {
        assert!(Config::load(Some("/nonexistent/feedline.yaml")).is_err());
    }
}
