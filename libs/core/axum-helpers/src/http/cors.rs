use axum::http::header::{ACCEPT, CONTENT_TYPE, InvalidHeaderValue};
use axum::http::{HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Parses a comma-separated origin list, skipping blank entries.
pub fn parse_allowed_origins(raw: &str) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(HeaderValue::from_str)
        .collect()
}

/// CORS layer for the JSON API.
///
/// Allows the verbs the resource routes use plus preflight, JSON content
/// headers, and caches preflight answers for an hour.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, ACCEPT])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_origins_trims_and_skips_blanks() {
        let origins =
            parse_allowed_origins("http://localhost:3000, ,https://example.com,").unwrap();
        assert_eq!(
            origins,
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("https://example.com"),
            ]
        );
    }

    #[test]
    fn test_parse_allowed_origins_rejects_control_characters() {
        assert!(parse_allowed_origins("http://bad\norigin").is_err());
    }
}
