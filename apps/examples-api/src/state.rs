//! Shared application state.

use database::postgres::DatabaseConnection;

/// Cloned into handlers that need it (Arc clones inside).
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
}
