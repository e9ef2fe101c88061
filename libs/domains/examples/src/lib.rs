//! Examples Domain
//!
//! CRUD over `Example` records: validation and not-found rules in the
//! service, storage behind the `ExampleRepository` trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, not-found rules, deadline
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← PostgreSQL or in-memory
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, request/response DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_examples::{handlers, InMemoryExampleRepository, ExampleService};
//! use mockable::DefaultClock;
//!
//! let clock = Arc::new(DefaultClock);
//! let repository = InMemoryExampleRepository::new(clock.clone());
//! let service = ExampleService::new(repository, clock);
//!
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ExampleError, ExampleResult};
pub use handlers::ApiDoc;
pub use models::{
    DEFAULT_PAGE_SIZE, Example, ExampleRequest, ExampleResponse, ListQuery, MAX_NAME_LEN,
    MAX_PAGE_SIZE, MessageResponse,
};
pub use postgres::PgExampleRepository;
pub use repository::{ExampleRepository, InMemoryExampleRepository};
pub use service::ExampleService;
