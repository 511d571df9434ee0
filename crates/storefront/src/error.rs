//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`; the `IntoResponse` impl is
//! the single point where upstream failures are logged and captured to
//! Sentry before the envelope is written to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::services::capture::CaptureError;
use crate::vtex::masterdata::MasterdataError;

/// Application-level error type for the capture service.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing or malformed. Never reaches the store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A document store call failed; status and message are passed through
    /// when the store provided them.
    #[error("Store error: {0}")]
    Store(#[from] MasterdataError),
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::MissingFields => Self::Validation(err.to_string()),
            CaptureError::Store(store_err) => Self::Store(store_err),
        }
    }
}

/// Structured error envelope returned on every failure path.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub ok: bool,
    /// Most specific message available.
    pub error: String,
    /// Raw store error payload, or null.
    pub details: Value,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            Self::Validation(message) => {
                tracing::debug!(error = %message, "Rejected invalid capture request");
                (StatusCode::BAD_REQUEST, message.clone(), Value::Null)
            }
            Self::Store(store_err) => {
                // Upstream failures are logged exactly once, here, with the
                // raw payload for operators; Sentry gets the same event.
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    details = ?store_err.details(),
                    sentry_event_id = %event_id,
                    "Store request failed"
                );

                let status = store_err
                    .status()
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let details = store_err.details().cloned().unwrap_or(Value::Null);
                (status, store_err.message(), details)
            }
        };

        (
            status,
            Json(ErrorBody {
                ok: false,
                error,
                details,
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
