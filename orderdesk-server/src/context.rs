//! Request-scoped context
//!
//! Holds the identifier of the request currently being served. The value is
//! bound to the task serving the request (tokio task-local), so code anywhere
//! below the handler can read it without it being passed around, and two
//! requests in flight on the same worker never observe each other's id.
//!
//! Binding is scoped: a context is bound for the lifetime of a future (or a
//! closure) and the previous value is restored when that future finishes,
//! fails, panics or is dropped.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use uuid::Uuid;

/// Returned by [`current_request_id`] outside of any request.
pub const UNDEFINED_REQUEST_ID: &str = "undefined";

tokio::task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Per-request context, created at request entry and dropped at exit.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub started_at: Instant,
}

impl RequestContext {
    /// Fresh context with a UUID v4 identifier, started now.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started_at: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `future` with `ctx` bound as the current request context.
pub async fn scope<F>(ctx: RequestContext, future: F) -> F::Output
where
    F: Future,
{
    REQUEST_CONTEXT.scope(ctx, future).await
}

/// Synchronous counterpart of [`scope`].
pub fn sync_scope<F, R>(ctx: RequestContext, f: F) -> R
where
    F: FnOnce() -> R,
{
    REQUEST_CONTEXT.sync_scope(ctx, f)
}

/// The context bound to the current task, if any.
pub fn current() -> Option<RequestContext> {
    REQUEST_CONTEXT.try_with(|ctx| ctx.clone()).ok()
}

/// The bound request id, or [`UNDEFINED_REQUEST_ID`].
pub fn current_request_id() -> String {
    REQUEST_CONTEXT
        .try_with(|ctx| ctx.request_id.clone())
        .unwrap_or_else(|_| UNDEFINED_REQUEST_ID.to_string())
}

/// Run `f` on the blocking pool with the caller's context rebound inside it.
///
/// Task-locals do not follow work onto other threads, so this captures the
/// context up front.
pub fn spawn_blocking<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    match current() {
        Some(ctx) => tokio::task::spawn_blocking(move || sync_scope(ctx, f)),
        None => tokio::task::spawn_blocking(f),
    }
}
