use axum::Router;
use domain_examples::{ExampleRepository, ExampleService};

pub mod examples;
pub mod health;

/// API routes without the `/api` prefix; `create_router` adds it.
pub fn routes<R: ExampleRepository + 'static>(service: ExampleService<R>) -> Router {
    Router::new().nest("/examples", examples::router(service))
}

/// `/ready`, checking the database with a real round trip.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
