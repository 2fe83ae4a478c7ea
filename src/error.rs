//! Unified error handling for the contact API.
//!
//! Every failure a handler can produce is an [`ApiError`]. Each variant maps
//! to one HTTP status and a fixed JSON body; only store failures carry the
//! underlying error text back to the caller.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// The store operation that failed, used to pick the fixed error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Fetch,
    Create,
    Delete,
}

impl StoreOp {
    /// Fixed category string reported in the `error` field.
    pub fn category(self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch contacts",
            Self::Create => "Failed to create contact",
            Self::Delete => "Failed to delete contact",
        }
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Name, email, and phone are required")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid contact ID")]
    InvalidId,

    #[error("Invalid request body")]
    InvalidBody(String),

    #[error("Contact not found")]
    ContactNotFound,

    #[error("Not found")]
    RouteNotFound { method: String, path: String },

    #[error("{op}")]
    Store { op: StoreOp, message: String },
}

impl ApiError {
    /// Wrap any store-side failure for `op`.
    pub fn store(op: StoreOp, err: impl fmt::Display) -> Self {
        Self::Store {
            op,
            message: err.to_string(),
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::InvalidEmail | Self::InvalidId | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::ContactNotFound | Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing_fields",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidId => "invalid_id",
            Self::InvalidBody(_) => "invalid_body",
            Self::ContactNotFound => "contact_not_found",
            Self::RouteNotFound { .. } => "route_not_found",
            Self::Store { .. } => "store_error",
        }
    }

    /// JSON body sent to the client.
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::InvalidBody(message) => json!({ "error": self.to_string(), "message": message }),
            Self::RouteNotFound { method, path } => json!({
                "error": self.to_string(),
                "message": format!("Cannot {} {}", method, path),
            }),
            Self::Store { op, message } => json!({ "error": op.category(), "message": message }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store { op, message } = &self {
            tracing::error!(operation = %op, error = %message, "Store operation failed");
        }
        crate::metrics::record_api_error(self.error_code());
        (self.status(), Json(self.body())).into_response()
    }
}
