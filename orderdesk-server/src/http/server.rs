//! Axum server setup
//!
//! Server skeleton with:
//! - Request tracer on every route, fallback included
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{middleware, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use super::routes;
use super::tracer::trace_requests;
use crate::db::SessionProvider;

/// Default pause for the `/sleep` endpoints.
pub const DEFAULT_SLEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:5050)
    pub bind_addr: SocketAddr,

    /// How long `/sleep` and `/sleep/blocking` wait (default: 5s)
    pub sleep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5050)),
            sleep_interval: DEFAULT_SLEEP_INTERVAL,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Source of per-request units of work
    pub sessions: Arc<dyn SessionProvider>,
    pub sleep_interval: Duration,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionProvider>) -> Self {
        Self {
            sessions,
            sleep_interval: DEFAULT_SLEEP_INTERVAL,
        }
    }

    pub fn with_sleep_interval(mut self, sleep_interval: Duration) -> Self {
        self.sleep_interval = sleep_interval;
        self
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::diagnostics::router())
        .merge(routes::users::router())
        .merge(routes::orders::router())
        .fallback(not_found)
        .layer(middleware::from_fn(trace_requests))
        .with_state(Arc::new(state))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let sessions = PgSessionProvider::connect(&database_url, &PoolSettings::default()).await?;
/// let sessions = Arc::new(sessions);
/// run_server(sessions, ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    sessions: Arc<dyn SessionProvider>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    tracing::info!(backend = sessions.backend(), "Session provider ready");
    let state = AppState::new(sessions).with_sleep_interval(config.sleep_interval);
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
