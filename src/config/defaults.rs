//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

/// Listening address when none is configured.
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Listening port when none is configured.
pub fn default_port() -> u16 {
    5000
}

// =============================================================================
// Database Defaults
// =============================================================================

/// Local store used when no URL is configured.
pub fn default_database_url() -> String {
    "sqlite://contactmanagement.db".to_string()
}

pub fn default_max_connections() -> u32 {
    5
}
