//! Integer path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Extractor for a single integer id path parameter.
///
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::extractors::IdPath;
///
/// async fn get_example(IdPath(id): IdPath) -> String {
///     format!("Example ID: {}", id)
/// }
///
/// let app: Router = Router::new().route("/examples/{id}", get(get_example));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InvalidId(e.body_text()))?;

        raw.trim()
            .parse::<i64>()
            .map(IdPath)
            .map_err(|_| AppError::InvalidId(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    async fn echo(IdPath(id): IdPath) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new().route("/examples/{id}", get(echo))
    }

    #[tokio::test]
    async fn test_numeric_id_extracted() {
        let response = app()
            .oneshot(Request::get("/examples/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_numeric_id_rejected() {
        let response = app()
            .oneshot(Request::get("/examples/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
