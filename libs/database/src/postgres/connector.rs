use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult};

/// Open a pool from `config` and probe it before handing it out.
///
/// The configuration is validated first. When the ping fails the pool that
/// was just opened is closed again, so a failed start holds no connections.
///
/// # Example
/// ```ignore
/// use database::postgres::{PostgresConfig, connect_from_config};
/// use core_config::FromEnv;
///
/// let db = connect_from_config(PostgresConfig::from_env()?).await?;
/// ```
pub async fn connect_from_config(config: PostgresConfig) -> DatabaseResult<DatabaseConnection> {
    config.validate()?;

    let max_connections = config.max_connections;
    let min_connections = config.min_connections;
    let db = Database::connect(config.into_connect_options())
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    if let Err(ping_err) = db.ping().await {
        warn!(error = %ping_err, "PostgreSQL ping failed, releasing pool");
        if let Err(close_err) = db.close().await {
            warn!(error = %close_err, "Failed to close pool after failed ping");
        }
        return Err(DatabaseError::ConnectionFailed(ping_err.to_string()));
    }

    info!(
        max_connections,
        min_connections, "Successfully connected to PostgreSQL database"
    );
    Ok(db)
}

/// Close the pool, waiting for checked-out connections to be returned.
pub async fn close(db: DatabaseConnection) -> DatabaseResult<()> {
    db.close().await?;
    info!("PostgreSQL pool closed");
    Ok(())
}

/// Run database migrations using the provided Migrator
///
/// # Example
/// ```ignore
/// use migration::Migrator;
/// use database::postgres::run_migrations;
///
/// run_migrations::<Migrator>(&db, "examples_api").await?;
/// ```
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!("Running {} database migrations...", app_name);
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!("Migrations completed successfully for {}", app_name);
    Ok(())
}
