//! Type-safe error codes for API responses.
//!
//! Each code has a client-facing identifier, an integer for logs and
//! metrics, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Path identifier is not a valid integer
    InvalidId,

    /// JSON extraction from request body failed
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// Query string could not be parsed
    InvalidQuery,

    /// Route exists but not for this method
    MethodNotAllowed,

    // Storage errors (2000-2999)
    /// Backing store failed or was unreachable
    PersistenceError,
}

impl ErrorCode {
    /// Client-facing identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::PersistenceError => "PERSISTENCE_ERROR",
        }
    }

    /// Integer code for logging and monitoring.
    ///
    /// - 1000-1999: client errors
    /// - 2000-2999: storage errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InvalidQuery => 1006,
            Self::MethodNotAllowed => 1007,
            Self::PersistenceError => 2001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Valid ID is required",
            Self::JsonExtraction => "Invalid request body",
            Self::NotFound => "The requested resource was not found",
            Self::InvalidQuery => "Invalid query parameters",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::PersistenceError => "A storage error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
