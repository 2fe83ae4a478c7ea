//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::db::is_memory_url;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("database.url is required")]
    MissingDatabaseUrl,
    #[error("database.url must be an sqlite: URL or :memory:, got '{0}'")]
    UnsupportedDatabaseUrl(String),
    #[error("database.max_connections must be at least 1")]
    NoConnections,
    #[error("server.host is not an IP address: '{0}'")]
    InvalidHost(String),
    #[error("server.metrics_port must differ from server.port ({0})")]
    MetricsPortConflict(u16),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let url = config.database.url.trim();
    if url.is_empty() {
        errors.push(ValidationError::MissingDatabaseUrl);
    } else if !is_memory_url(url) && !url.starts_with("sqlite:") {
        errors.push(ValidationError::UnsupportedDatabaseUrl(url.to_string()));
    }

    if config.database.max_connections == 0 {
        errors.push(ValidationError::NoConnections);
    }

    if config.server.listen_addr().is_err() {
        errors.push(ValidationError::InvalidHost(config.server.host.clone()));
    }

    if let Some(metrics_port) = config.server.metrics_port
        && metrics_port != 0
        && metrics_port == config.server.port
    {
        errors.push(ValidationError::MetricsPortConflict(metrics_port));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
