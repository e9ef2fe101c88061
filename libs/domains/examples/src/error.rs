use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExampleError {
    /// Caller input broke a rule; carries the first failing rule's message.
    #[error("{0}")]
    Validation(String),

    #[error("Example {0} not found")]
    NotFound(i64),

    /// Storage or connectivity failure. `detail` is for logs only and is
    /// never rendered by `Display`.
    #[error("Failed to {operation} example")]
    Persistence {
        operation: &'static str,
        detail: String,
    },
}

pub type ExampleResult<T> = Result<T, ExampleError>;

impl ExampleError {
    pub fn persistence(operation: &'static str, detail: impl Display) -> Self {
        ExampleError::Persistence {
            operation,
            detail: detail.to_string(),
        }
    }

    /// Full failure text for logging, including the backend detail.
    pub fn detail(&self) -> String {
        match self {
            ExampleError::Persistence { operation, detail } => {
                format!("failed to {operation} example: {detail}")
            }
            other => other.to_string(),
        }
    }
}

/// Convert ExampleError to AppError for standardized error responses
impl From<ExampleError> for AppError {
    fn from(err: ExampleError) -> Self {
        match err {
            ExampleError::Validation(msg) => AppError::BadRequest(msg),
            ExampleError::NotFound(_) => AppError::NotFound("Example not found".to_string()),
            persistence @ ExampleError::Persistence { .. } => {
                AppError::Persistence(persistence.to_string())
            }
        }
    }
}

impl IntoResponse for ExampleError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_display_hides_detail() {
        let err = ExampleError::persistence("update", "connection refused (os error 111)");
        assert_eq!(err.to_string(), "Failed to update example");
        assert!(err.detail().contains("connection refused"));
    }

    #[test]
    fn test_app_error_mapping() {
        assert!(matches!(
            AppError::from(ExampleError::Validation("name is required".into())),
            AppError::BadRequest(msg) if msg == "name is required"
        ));
        assert!(matches!(
            AppError::from(ExampleError::NotFound(7)),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(ExampleError::persistence("create", "boom")),
            AppError::Persistence(msg) if !msg.contains("boom")
        ));
    }
}
