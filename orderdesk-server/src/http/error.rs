//! API error types with IntoResponse
//!
//! Errors become JSON bodies of the form `{"detail": "..."}`. Server-side
//! failures are logged with the request id and answered with a generic
//! message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::context;
use crate::db::DbError;
use crate::services::ServiceError;

/// Detail sent for every 500.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal Server Error";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or incomplete input (422)
    Validation { message: String },

    /// Referenced entity not found (404)
    NotFound { resource: &'static str },

    /// Storage failure (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            Self::Validation { message } => message.clone(),
            Self::NotFound { resource } => format!("{} not found", resource),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!(
                    request_id = %context::current_request_id(),
                    error = %e,
                    "Database error"
                );
                INTERNAL_ERROR_DETAIL.to_string()
            }
            Self::Internal { message } => {
                tracing::error!(
                    request_id = %context::current_request_id(),
                    error = %message,
                    "Internal error"
                );
                INTERNAL_ERROR_DETAIL.to_string()
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, .. } => Self::NotFound { resource },
            _ => Self::Database(e),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(resource) => Self::NotFound { resource },
            ServiceError::Db(e) => e.into(),
        }
    }
}
