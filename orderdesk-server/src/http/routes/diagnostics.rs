//! Diagnostic endpoints
//!
//! `/ping` answers immediately. `/sleep` suspends the handler for the
//! configured interval without holding a worker thread, so concurrent calls
//! overlap instead of queueing. `/sleep/blocking` does the same wait as a
//! blocking thread sleep, run on the blocking pool so the async workers stay
//! free.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::context;
use crate::http::error::ApiError;
use crate::http::server::AppState;

pub const PONG: &str = "pong";

/// "Woke up after 5 seconds" for the default interval; fractional intervals
/// are printed as such ("Woke up after 0.3 seconds").
pub fn woke_up_message(interval: Duration) -> String {
    if interval.subsec_nanos() == 0 {
        format!("Woke up after {} seconds", interval.as_secs())
    } else {
        format!("Woke up after {} seconds", interval.as_secs_f64())
    }
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Blocking sleep response, naming the thread that slept
#[derive(Debug, Serialize)]
pub struct BlockingSleepResponse {
    pub thread: String,
    pub message: String,
}

/// GET /ping
async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: PONG.to_string(),
    })
}

/// GET /sleep
async fn sleep(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    tracing::debug!(interval_ms = state.sleep_interval.as_millis() as u64, "sleeping");
    tokio::time::sleep(state.sleep_interval).await;
    Json(MessageResponse {
        message: woke_up_message(state.sleep_interval),
    })
}

/// GET /sleep/blocking
async fn sleep_blocking(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BlockingSleepResponse>, ApiError> {
    let interval = state.sleep_interval;
    let thread = context::spawn_blocking(move || {
        tracing::debug!(interval_ms = interval.as_millis() as u64, "blocking sleep");
        std::thread::sleep(interval);
        std::thread::current()
            .name()
            .unwrap_or("unnamed")
            .to_string()
    })
    .await
    .map_err(|e| ApiError::Internal {
        message: format!("blocking sleep failed: {}", e),
    })?;

    Ok(Json(BlockingSleepResponse {
        thread,
        message: woke_up_message(interval),
    }))
}

/// Diagnostic routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(ping))
        .route("/sleep", get(sleep))
        .route("/sleep/blocking", get(sleep_blocking))
}
