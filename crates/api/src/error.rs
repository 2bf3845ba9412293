use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use restyle_core::error::CoreError;
use restyle_store::StoreError;
use serde_json::json;

use crate::engine::orchestrator::TransformError;

/// Top-level message for any failure after a job was accepted.
pub const TRANSFORM_FAILED: &str = "Failed to process image with AI";

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce `{ "error", "code", "details"? }`
/// JSON bodies. Internal failures are logged and reported with a sanitized
/// message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `restyle_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed transform job.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// An asset store or ledger error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found"),
                    None,
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
            },

            // --- Transform job failures ---
            AppError::Transform(err) => match err {
                TransformError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                TransformError::Upstream(detail) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    TRANSFORM_FAILED.to_string(),
                    Some(detail.clone()),
                ),
                TransformError::Download(detail) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOWNLOAD_ERROR",
                    TRANSFORM_FAILED.to_string(),
                    Some(detail.clone()),
                ),
                TransformError::Io(msg) => {
                    tracing::error!(error = %msg, "Transform storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "IO_ERROR",
                        "Failed to process image".to_string(),
                        None,
                    )
                }
            },

            // --- Store errors ---
            AppError::Store(err) => match err {
                StoreError::NotFound(_) | StoreError::InvalidName(_) => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "File not found".to_string(),
                    None,
                ),
                other => internal("Storage error", &other.to_string()),
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal(context: &str, msg: &str) -> (StatusCode, &'static str, String, Option<String>) {
    tracing::error!(error = %msg, "{context}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}
