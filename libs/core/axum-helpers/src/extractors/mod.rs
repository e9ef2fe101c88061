//! Custom extractors for Axum handlers.
//!
//! Each one turns its axum rejection into an [`AppError`](crate::AppError)
//! so every client error shares the [`ErrorResponse`](crate::ErrorResponse) body.

pub mod id_path;
pub mod json;
pub mod query;

pub use id_path::IdPath;
pub use json::AppJson;
pub use query::AppQuery;
