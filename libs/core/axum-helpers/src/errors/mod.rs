pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// ```json
/// {
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Example not found"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Query extraction error: {0}")]
    QueryExtractorRejection(#[from] QueryRejection),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    /// Storage failure; the message must already be safe to show clients.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::JsonExtraction.default_message().to_string(),
                    Some(serde_json::Value::String(e.body_text())),
                    ErrorCode::JsonExtraction,
                )
            }
            AppError::QueryExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidQuery.code(),
                    "Query extraction error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidQuery.default_message().to_string(),
                    Some(serde_json::Value::String(e.body_text())),
                    ErrorCode::InvalidQuery,
                )
            }
            AppError::InvalidId(raw) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidId.code(),
                    "Invalid id in path: {}",
                    raw
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidId.default_message().to_string(),
                    None,
                    ErrorCode::InvalidId,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::ValidationError)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::Persistence(msg) => {
                tracing::error!(
                    error_code = ErrorCode::PersistenceError.code(),
                    "Persistence error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg,
                    None,
                    ErrorCode::PersistenceError,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Build an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}
