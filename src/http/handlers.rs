//! Route handlers.
//!
//! Each handler is stateless: it validates the request, makes at most one
//! store call through the shared [`Database`](crate::db::Database) handle,
//! and shapes the JSON response.

use super::AppState;
use super::payload::{ContactPayload, is_valid_email};
use crate::contact::{Contact, ContactId, NewContact};
use crate::error::{ApiError, StoreOp};
use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

/// GET / - static API descriptor.
pub async fn api_info() -> Json<Value> {
    Json(json!({
        "message": "Contact Management API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /api/contacts": "Fetch all contacts",
            "POST /api/contacts": "Create a new contact",
            "DELETE /api/contacts/:id": "Delete a contact by ID",
            "GET /api/health": "Health check endpoint",
        },
        "status": "running",
    }))
}

/// GET /api/health - liveness only, never touches the store.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "Server is running" }))
}

/// GET /api/contacts - every contact, newest first.
pub async fn list_contacts(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state
        .db
        .contacts()
        .list()
        .await
        .map_err(|e| ApiError::store(StoreOp::Fetch, e))?;
    Ok(Json(contacts))
}

/// POST /api/contacts
///
/// Presence check, then email shape, then the structural model stage, then
/// the insert. Nothing is written unless every earlier step passed.
pub async fn create_contact(
    State(state): State<AppState>,
    ContactPayload(request): ContactPayload,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let fields = request.required_fields()?;

    if !is_valid_email(fields.email) {
        return Err(ApiError::InvalidEmail);
    }

    let new = NewContact::new(fields.name, fields.email, fields.phone, request.message())
        .map_err(|e| ApiError::store(StoreOp::Create, e))?;

    let contact = state
        .db
        .contacts()
        .insert(&new)
        .await
        .map_err(|e| ApiError::store(StoreOp::Create, e))?;

    crate::metrics::record_contact_created();
    info!(id = %contact.id, "Contact created");

    Ok((StatusCode::CREATED, Json(contact)))
}

#[derive(Debug, Serialize)]
pub struct DeletedContact {
    pub message: &'static str,
    pub contact: Contact,
}

/// DELETE /api/contacts/:id
///
/// An id that does not decode to text is as malformed as one that is not a
/// UUID.
pub async fn delete_contact(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeletedContact>, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::InvalidId)?;
    let id: ContactId = id.parse().map_err(|_| ApiError::InvalidId)?;

    let contact = state
        .db
        .contacts()
        .delete(id)
        .await
        .map_err(|e| ApiError::store(StoreOp::Delete, e))?
        .ok_or(ApiError::ContactNotFound)?;

    crate::metrics::record_contact_deleted();
    info!(id = %contact.id, "Contact deleted");

    Ok(Json(DeletedContact {
        message: "Contact deleted successfully",
        contact,
    }))
}

/// Fallback for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
