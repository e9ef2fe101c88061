use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

use crate::error::{ExampleError, ExampleResult};
use crate::models::{Example, ExampleRequest, MAX_PAGE_SIZE, first_violation};
use crate::repository::ExampleRepository;

/// Service layer for Example business logic
pub struct ExampleService<R: ExampleRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock + Send + Sync>,
    timeout: Option<Duration>,
}

impl<R: ExampleRepository> Clone for ExampleService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            timeout: self.timeout,
        }
    }
}

fn validate_request(input: &ExampleRequest) -> ExampleResult<()> {
    input
        .validate()
        .map_err(|e| ExampleError::Validation(first_violation(&e)))
}

fn require_positive_id(id: i64) -> ExampleResult<()> {
    if id <= 0 {
        return Err(ExampleError::Validation(
            "example ID must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Emits the failure event for `operation`. Persistence failures carry the backend detail.
fn log_failure(operation: &'static str, id: Option<i64>, err: &ExampleError) {
    match err {
        ExampleError::Persistence { .. } => {
            tracing::error!(operation, example_id = id, error = %err.detail(), "Example operation failed")
        }
        _ => tracing::warn!(operation, example_id = id, error = %err, "Example operation rejected"),
    }
}

impl<R: ExampleRepository> ExampleService<R> {
    pub fn new(repository: R, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            repository: Arc::new(repository),
            clock,
            timeout: None,
        }
    }

    /// Bound every storage call by `timeout`; overruns become persistence errors.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn storage<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = ExampleResult<T>>,
    ) -> ExampleResult<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                ExampleError::persistence(operation, format!("timed out after {limit:?}"))
            })?,
            None => call.await,
        }
    }

    /// Create a new example
    pub async fn create_example(&self, input: ExampleRequest) -> ExampleResult<Example> {
        let result = async {
            validate_request(&input)?;
            let draft = Example::new(input, self.clock.utc());
            self.storage("create", self.repository.create(draft)).await
        }
        .await;

        match &result {
            Ok(example) => tracing::info!(example_id = example.id, "Created example"),
            Err(err) => log_failure("create", None, err),
        }
        result
    }

    /// Get an example by ID
    pub async fn get_example_by_id(&self, id: i64) -> ExampleResult<Example> {
        let result = async {
            require_positive_id(id)?;
            self.storage("get", self.repository.get_by_id(id))
                .await?
                .ok_or(ExampleError::NotFound(id))
        }
        .await;

        match &result {
            Ok(_) => tracing::info!(example_id = id, "Fetched example"),
            Err(err) => log_failure("get", Some(id), err),
        }
        result
    }

    /// List examples ordered by id. `limit` is clamped to [`MAX_PAGE_SIZE`].
    pub async fn get_all_examples(&self, limit: i64, offset: i64) -> ExampleResult<Vec<Example>> {
        let result = async {
            if limit <= 0 {
                return Err(ExampleError::Validation("limit must be positive".to_string()));
            }
            if offset < 0 {
                return Err(ExampleError::Validation(
                    "offset must be non-negative".to_string(),
                ));
            }
            let limit = limit.min(MAX_PAGE_SIZE) as u64;
            self.storage("list", self.repository.list(limit, offset as u64))
                .await
        }
        .await;

        match &result {
            Ok(examples) => tracing::info!(limit, offset, count = examples.len(), "Listed examples"),
            Err(err) => log_failure("list", None, err),
        }
        result
    }

    /// Replace the mutable fields of an existing example
    ///
    /// Reads the current row first for existence and its `created_at`. A
    /// delete landing between that read and the write surfaces as `NotFound`.
    pub async fn update_example(&self, id: i64, input: ExampleRequest) -> ExampleResult<Example> {
        let result = async {
            require_positive_id(id)?;
            validate_request(&input)?;

            let mut example = self
                .storage("get", self.repository.get_by_id(id))
                .await?
                .ok_or(ExampleError::NotFound(id))?;

            example.apply_update(input, self.clock.utc());
            self.storage("update", self.repository.update(example)).await
        }
        .await;

        match &result {
            Ok(_) => tracing::info!(example_id = id, "Updated example"),
            Err(err) => log_failure("update", Some(id), err),
        }
        result
    }

    /// Delete an example
    pub async fn delete_example(&self, id: i64) -> ExampleResult<()> {
        let result = async {
            require_positive_id(id)?;

            if self
                .storage("get", self.repository.get_by_id(id))
                .await?
                .is_none()
            {
                return Err(ExampleError::NotFound(id));
            }

            self.storage("delete", self.repository.delete(id)).await
        }
        .await;

        match &result {
            Ok(()) => tracing::info!(example_id = id, "Deleted example"),
            Err(err) => log_failure("delete", Some(id), err),
        }
        result
    }

    /// Release the repository's resources. Safe to call more than once.
    pub async fn close(&self) -> ExampleResult<()> {
        self.repository.close().await
    }
}
