//! PostgreSQL pool lifecycle: configuration, eager connect, migrations and health probes.

mod config;
mod connector;
mod health;

pub use config::{PoolTimeouts, PostgresConfig};
pub use connector::{close, connect_from_config, run_migrations};
pub use health::check_health;

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
