//! # Axum Helpers
//!
//! Shared HTTP plumbing for the workspace's Axum services.
//!
//! - **[`server`]**: router assembly with Swagger UI, health endpoints,
//!   graceful shutdown with a bounded drain
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: [`AppError`] and the JSON [`ErrorResponse`] body
//! - **[`extractors`]**: path, JSON and query extractors that reject with [`AppError`]

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, serve_with_shutdown, shutdown_signal,
};

pub use http::{create_cors_layer, parse_allowed_origins, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{AppJson, AppQuery, IdPath};
