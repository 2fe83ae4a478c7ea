//! Test server management.
//!
//! Runs the API router on an ephemeral localhost port inside the test's
//! tokio runtime.

use contact_api::config::DatabaseConfig;
use contact_api::{AppState, Config, Database, build_app, build_router};
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
    /// Spawn a server backed by a fresh in-memory store.
    pub async fn spawn() -> anyhow::Result<Self> {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            ..DatabaseConfig::default()
        };
        let db = Database::connect(&config).await?;
        Self::serve(build_router(AppState::new(db))).await
    }

    /// Spawn a server the way the binary does, through `build_app`.
    pub async fn spawn_with_config(config: &Config) -> anyhow::Result<Self> {
        let app = build_app(config).await?;
        Self::serve(app).await
    }

    async fn serve(app: axum::Router) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self { addr, handle })
    }

    /// Base URL, e.g. `http://127.0.0.1:40123`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Create a client for this server.
    pub fn client(&self) -> super::client::TestClient {
        super::client::TestClient::new(self.url())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
