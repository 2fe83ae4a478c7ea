//! Environment overrides.
//!
//! Environment variables take precedence over the TOML file and built-in
//! defaults. The lookup is injected so tests never touch the process
//! environment.

use super::types::{Config, ConfigError};

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const METRICS_PORT: &str = "METRICS_PORT";
pub const STORE_FAIL_FAST: &str = "STORE_FAIL_FAST";

impl Config {
    /// Apply overrides from `lookup`. Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(DATABASE_URL) {
            self.database.url = url;
        }
        if let Some(host) = get(HOST) {
            self.server.host = host;
        }
        if let Some(port) = get(PORT) {
            self.server.port = parse_port(PORT, &port)?;
        }
        if let Some(port) = get(METRICS_PORT) {
            self.server.metrics_port = Some(parse_port(METRICS_PORT, &port)?);
        }
        if let Some(flag) = get(STORE_FAIL_FAST) {
            self.database.fail_fast = parse_flag(STORE_FAIL_FAST, &flag)?;
        }
        Ok(())
    }
}

fn parse_port(key: &'static str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key,
            value: value.to_string(),
        }),
    }
}
