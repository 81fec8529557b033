//! Request tracer middleware
//!
//! Wraps every request:
//! 1. generates a fresh request id and binds it as the request context
//! 2. logs "request started" (method, path, id)
//! 3. runs the handler chain inside a `request` span, so every log line
//!    emitted on the way down carries the id
//! 4. logs completion at info with status and elapsed time, or the panic
//!    message at error if the handler chain panicked (handler errors are
//!    logged by `ApiError` itself)
//! 5. sets `x-request-id` on the response, success or failure
//!
//! The context is unbound when the scoped future ends, on every path.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::FutureExt;
use serde_json::json;
use tracing::Instrument;

use super::error::INTERNAL_ERROR_DETAIL;
use crate::context::{self, RequestContext};

/// Response header carrying the request id.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Axum middleware; install with `axum::middleware::from_fn(trace_requests)`.
pub async fn trace_requests(req: Request, next: Next) -> Response {
    let ctx = RequestContext::new();
    let request_id = ctx.request_id.clone();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    let traced = async move {
        tracing::info!("request started");

        let outcome = AssertUnwindSafe(next.run(req)).catch_unwind().await;
        let elapsed = context::current().map(|ctx| ctx.elapsed()).unwrap_or_default();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;

        let mut response = match outcome {
            Ok(response) => {
                tracing::info!(status = response.status().as_u16(), elapsed_ms, "request completed");
                response
            }
            Err(panic) => {
                tracing::error!(
                    error = %panic_message(panic.as_ref()),
                    elapsed_ms,
                    "request failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": INTERNAL_ERROR_DETAIL })),
                )
                    .into_response()
            }
        };

        if let Ok(value) = HeaderValue::from_str(&context::current_request_id()) {
            response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
        }
        response
    };

    context::scope(ctx, traced.instrument(span)).await
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
