//! contact-api - Contact Management API
//!
//! Create, list and delete contact records over HTTP, backed by a single
//! SQLite collection. The composed [`Router`] is exported through
//! [`build_app`] so it can be hosted by something other than the bundled
//! binary.

pub mod config;
pub mod contact;
pub mod db;
pub mod error;
pub mod http;
pub mod metrics;
pub mod telemetry;

pub use config::Config;
pub use contact::{Contact, ContactId, NewContact};
pub use db::{Database, DbError};
pub use error::ApiError;
pub use http::{AppState, build_router};

use axum::Router;

/// Open the store (permissively unless `database.fail_fast`) and compose the
/// application router.
pub async fn build_app(config: &Config) -> Result<Router, DbError> {
    let db = Database::open(&config.database).await?;
    Ok(build_router(AppState::new(db)))
}
