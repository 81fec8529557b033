//! HTTP server layer
//!
//! Axum server with:
//! - Request tracer (request id, latency logging, `x-request-id` header)
//! - One unit of work per request via the `Session` extractor
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;
pub mod tracer;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError, DEFAULT_SLEEP_INTERVAL};
pub use tracer::REQUEST_ID_HEADER;
