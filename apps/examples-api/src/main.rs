use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // color-eyre first, before anything fallible
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        name = config.app.name,
        version = config.app.version,
        environment = ?config.environment,
        "Starting"
    );

    // Fail fast: the process never serves without a reachable store
    let db = database::postgres::connect_from_config(config.database.clone())
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;
    }

    let state = AppState { config, db };

    let service = api::examples::service(&state);
    let api_routes = api::routes(service.clone());

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    // - /health: liveness with app name/version
    // - /ready: readiness with a database round trip
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::ready_router(state.clone()));

    let shutdown_timeout = state.config.shutdown_timeout;
    info!(
        "Starting examples API with graceful shutdown ({:?} timeout)",
        shutdown_timeout
    );

    create_production_app(app, &state.config.server, shutdown_timeout, async move {
        info!("Shutting down: closing example store");
        match service.close().await {
            Ok(()) => info!("Example store closed"),
            Err(e) => tracing::error!(error = %e.detail(), "Error closing example store"),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Examples API shutdown complete");
    Ok(())
}
