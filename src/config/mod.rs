//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, DatabaseConfig)
//! - [`defaults`]: Serde default value functions
//! - [`env`]: Environment (and `.env` file) overrides
//! - [`validation`]: Startup validation

mod defaults;
mod env;
mod types;
pub mod validation;

pub use types::{Config, ConfigError, DatabaseConfig, ServerConfig};
