//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Builds the in-memory registry and GeoIP provider
//! - Starts the HTTP server with graceful shutdown support

use std::net::SocketAddr;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use shortcode::config::Config;
use shortcode::route::create_app;
use shortcode::state::AppState;

const DEFAULT_RUST_LOG: &str = "shortcode=debug,tower_http=debug";

/// Application entry point
///
/// All state lives in memory and is lost when the process exits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_RUST_LOG)),
        )
        .init();

    let config = Config::from_env()?;
    let addr = format!("{}:{}", config.bind_addr, config.port);
    let base_url = config.base_url.clone();

    let state = AppState::from_config(config);
    let app = create_app(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(package = "service", "Server running on {}", addr);
    tracing::info!(package = "service", "Short links use {}", base_url);

    // The server will continue running until it receives SIGTERM or SIGINT
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Handles graceful shutdown signals
///
/// Returns on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!(package = "service", "Shutdown signal received, stopping server");
}
