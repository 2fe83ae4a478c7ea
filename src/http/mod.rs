//! HTTP surface: routes, shared state and the optional metrics listener.

pub mod handlers;
pub mod middleware;
pub mod payload;

use crate::db::Database;
use axum::middleware::from_fn;
use axum::routing::{delete, get};
use axum::Router;
use std::net::SocketAddr;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Compose the API router with its middleware.
///
/// Every path also answers with a trailing slash.
pub fn build_router(state: AppState) -> Router {
    let contacts = get(handlers::list_contacts)
        .post(handlers::create_contact)
        .fallback(handlers::not_found);
    let contact = delete(handlers::delete_contact).fallback(handlers::not_found);
    let health = get(handlers::health);

    Router::new()
        .route("/", get(handlers::api_info))
        .route("/api/contacts", contacts.clone())
        .route("/api/contacts/", contacts)
        .route("/api/contacts/:id", contact.clone())
        .route("/api/contacts/:id/", contact)
        .route("/api/health", health.clone())
        .route("/api/health/", health)
        .fallback(handlers::not_found)
        .layer(from_fn(middleware::request_tracing_middleware))
        .layer(from_fn(middleware::cors_middleware))
        .with_state(state)
}

async fn metrics_handler() -> String {
    crate::metrics::gather_metrics()
}

/// Serve `GET /metrics` on `0.0.0.0:port` until the process exits.
///
/// A bind failure is logged and ends the task; the API keeps serving.
pub async fn run_metrics_server(port: u16) {
    let app = Router::new().route("/metrics", get(metrics_handler));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Metrics listener failed to bind");
            return;
        }
    };
    tracing::info!(%addr, "Metrics listener ready");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Metrics listener stopped");
    }
}
