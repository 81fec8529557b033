//! orderdesk-server: user/order HTTP service with request-scoped sessions
//!
//! Each request gets a fresh request id bound for the duration of its
//! handling (see [`context`]) and its own unit of work (see [`db`]). The
//! `/sleep` diagnostics show that a slow request does not hold up others.

pub mod context;
pub mod db;
pub mod http;
pub mod models;
pub mod services;

pub use context::{current_request_id, RequestContext};
pub use db::{DbError, MemorySessionProvider, PgSessionProvider, SessionProvider, UnitOfWork};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
