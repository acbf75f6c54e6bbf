//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server faults are captured to
//! Sentry before the response is built; clients only ever see a short message
//! in a JSON body of the form `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::ServiceError;

/// Application-level error type for the HTTP layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Registry operation failed.
    #[error("Registry error: {0}")]
    Registry(#[from] ServiceError),

    /// Request could not be understood.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Registry(err) => match err {
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::EmailConflict => StatusCode::CONFLICT,
                ServiceError::NotFound => StatusCode::NOT_FOUND,
                ServiceError::Entropy(_) | ServiceError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Registry(err) => match err {
                // Don't expose internal error details to clients
                ServiceError::Entropy(_) | ServiceError::Storage(_) => {
                    "internal server error".to_owned()
                }
                other => other.to_string(),
            },
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
