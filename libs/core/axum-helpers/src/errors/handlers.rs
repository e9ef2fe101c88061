use axum::response::Response;
use axum::http::StatusCode;

use super::{ErrorCode, error_response};

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::NotFound.default_message().to_string(),
        ErrorCode::NotFound,
    )
}

/// Handler for 405 Method Not Allowed errors.
pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed.default_message().to_string(),
        ErrorCode::MethodNotAllowed,
    )
}
