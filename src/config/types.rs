//! Core configuration types and loading.

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_database_url, default_host, default_max_connections, default_port};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("invalid listen address {0}")]
    InvalidHost(String),
}

/// Service configuration.
///
/// Every field has a built-in default, so an empty TOML document (or no file
/// at all) yields a runnable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// API port (default: 5000). `0` binds an ephemeral port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Prometheus metrics HTTP port. Unset or `0` disables the endpoint.
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_port: None,
        }
    }
}

impl ServerConfig {
    /// Socket address the API listener binds to.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (`sqlite://path/to/file.db` or `:memory:`).
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Upper bound on pooled connections for file databases.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Exit at startup when the store cannot be reached instead of serving
    /// with a store that fails per request.
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            fail_fast: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// Starts from the TOML file when one is given (built-in defaults
    /// otherwise), loads a `.env` file into the environment if present, then
    /// applies environment overrides. `.env` never replaces variables that are
    /// already set in the process environment.
    pub fn from_sources(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }
}
