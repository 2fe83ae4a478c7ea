//! contact-api binary: loads configuration, opens the store and serves the
//! API on the configured port.

use anyhow::Context;
use contact_api::config::validation;
use contact_api::{Config, build_app, http, metrics};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env may set RUST_LOG, so it is loaded before the filter is built.
    // Errors are reported by Config::from_sources once logging is up.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Optional TOML config file as the first argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    let config = Config::from_sources(config_path.as_deref()).map_err(|e| {
        error!(path = ?config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = validation::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        database = %config.database.url,
        "Starting contact-api"
    );

    // Convention: metrics_port = 0 (or unset) disables the metrics endpoint.
    match config.server.metrics_port {
        Some(port) if port != 0 => {
            metrics::init();
            tokio::spawn(async move {
                http::run_metrics_server(port).await;
            });
            info!(port = port, "Metrics enabled");
        }
        _ => info!("Metrics disabled"),
    }

    let app = build_app(&config).await?;

    let addr = config.server.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let local = listener.local_addr()?;
    info!(port = local.port(), address = %local, "Server is running on port {}", local.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
