//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It
//! implements `axum::response::IntoResponse` to produce structured JSON
//! error responses with appropriate HTTP status codes. Error kinds from the
//! lower layers are preserved, never folded into a uniform failure body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pipehub_check::ValidationError;
use pipehub_core::DescribeError;
use pipehub_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details (e.g., validation diagnostics).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request, e.g. an unconvertible graph description (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Structural validation failed with diagnostics (422).
    #[error("validation failed")]
    ValidationFailed(Vec<ValidationError>),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            ApiError::ValidationFailed(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorDetail {
                    code: "VALIDATION_FAILED".to_string(),
                    message: format!("{} validation error(s)", errors.len()),
                    details: serde_json::to_value(errors).ok(),
                },
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
        };

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<DescribeError> for ApiError {
    fn from(err: DescribeError) -> Self {
        // Every conversion failure is the caller's malformed description.
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::PipelineNotFound(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}
