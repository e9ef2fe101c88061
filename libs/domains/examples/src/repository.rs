use async_trait::async_trait;
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{ExampleError, ExampleResult};
use crate::models::{Example, storage_timestamp};

/// Repository trait for Example persistence
///
/// Absence on read is `Ok(None)`. A write that matches no row is
/// `ExampleError::NotFound`. Everything else that goes wrong is
/// `ExampleError::Persistence`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExampleRepository: Send + Sync {
    /// Insert a new example. The store assigns the id and both timestamps.
    async fn create(&self, example: Example) -> ExampleResult<Example>;

    /// Get an example by ID
    async fn get_by_id(&self, id: i64) -> ExampleResult<Option<Example>>;

    /// List examples by ascending id
    async fn list(&self, limit: u64, offset: u64) -> ExampleResult<Vec<Example>>;

    /// Overwrite the mutable fields of `example.id`
    async fn update(&self, example: Example) -> ExampleResult<Example>;

    /// Delete an example by ID
    async fn delete(&self, id: i64) -> ExampleResult<()>;

    /// Release the underlying resources. Idempotent.
    async fn close(&self) -> ExampleResult<()>;
}

/// In-memory implementation of ExampleRepository (for development/testing)
#[derive(Clone)]
pub struct InMemoryExampleRepository {
    examples: Arc<RwLock<BTreeMap<i64, Example>>>,
    next_id: Arc<AtomicI64>,
    clock: Arc<dyn Clock + Send + Sync>,
    unavailable: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl InMemoryExampleRepository {
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            examples: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            clock,
            unavailable: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent call fail as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_available(&self, operation: &'static str) -> ExampleResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ExampleError::persistence(operation, "repository is closed"));
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ExampleError::persistence(operation, "store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ExampleRepository for InMemoryExampleRepository {
    async fn create(&self, mut example: Example) -> ExampleResult<Example> {
        self.ensure_available("create")?;

        let now = storage_timestamp(self.clock.utc());
        example.id = self.next_id.fetch_add(1, Ordering::SeqCst);
        example.created_at = now;
        example.updated_at = now;

        self.examples
            .write()
            .await
            .insert(example.id, example.clone());

        tracing::debug!(example_id = example.id, "Stored example in memory");
        Ok(example)
    }

    async fn get_by_id(&self, id: i64) -> ExampleResult<Option<Example>> {
        self.ensure_available("get")?;
        Ok(self.examples.read().await.get(&id).cloned())
    }

    async fn list(&self, limit: u64, offset: u64) -> ExampleResult<Vec<Example>> {
        self.ensure_available("list")?;

        let examples = self.examples.read().await;
        Ok(examples
            .values()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn update(&self, example: Example) -> ExampleResult<Example> {
        self.ensure_available("update")?;

        let mut examples = self.examples.write().await;
        let stored = examples
            .get_mut(&example.id)
            .ok_or(ExampleError::NotFound(example.id))?;

        stored.name = example.name;
        stored.description = example.description;
        stored.value = example.value;
        stored.is_active = example.is_active;
        stored.updated_at = example.updated_at;

        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> ExampleResult<()> {
        self.ensure_available("delete")?;

        self.examples
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(ExampleError::NotFound(id))
    }

    async fn close(&self) -> ExampleResult<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("In-memory example store closed");
        }
        Ok(())
    }
}
