//! Configuration management for feedpub
//!
//! Settings are layered, lowest priority first:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Usage
//!
//! ```no_run
//! use feedpub::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Any key can be overridden with `FEEDPUB__<section>__<key>`:
//! - `FEEDPUB__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `FEEDPUB__FETCH__REQUEST_TIMEOUT_MS=5000`
//! - `FEEDPUB__FETCH__MAX_FEED_BYTES=2MB`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/feedpub.toml`.
//! This can be overridden using the `FEEDPUB_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{Config, FetchConfig, PublicationConfig, ServerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("feedpub.toml");

        let toml_content = r#"
[server]
bind_addr = "0.0.0.0:8081"

[fetch]
connect_timeout_ms = 2000
request_timeout_ms = 15000
user_agent = "test-agent/1.0"
max_redirects = 3
max_feed_bytes = "512KB"

[publication]
language = "fr"
chapter_dir = "text"
chapter_extension = "xhtml"
chapter_media_type = "application/xhtml+xml"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.fetch.user_agent, "test-agent/1.0");
        assert_eq!(config.fetch.max_redirects, 3);
        assert_eq!(config.fetch.max_feed_bytes.as_u64(), 512 * 1024);
        assert_eq!(config.publication.chapter_dir, "text");
    }

    #[test]
    fn test_validation_runs_after_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("feedpub.toml");

        fs::write(&config_path, "[fetch]\nrequest_timeout_ms = 0\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError(ValidationError::ZeroTimeout { .. }))
        ));
    }
}
