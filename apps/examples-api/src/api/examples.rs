use axum::Router;
use domain_examples::{
    ExampleRepository, ExampleService, PgExampleRepository, handlers,
};
use mockable::DefaultClock;
use std::sync::Arc;

/// Builds the PostgreSQL-backed service with the configured deadline.
pub fn service(state: &crate::state::AppState) -> ExampleService<PgExampleRepository> {
    let clock = Arc::new(DefaultClock);
    let repository = PgExampleRepository::new(state.db.clone(), clock.clone());
    let service = ExampleService::new(repository, clock);

    match state.config.operation_timeout {
        Some(timeout) => service.with_timeout(timeout),
        None => service,
    }
}

pub fn router<R: ExampleRepository + 'static>(service: ExampleService<R>) -> Router {
    handlers::router(service)
}
