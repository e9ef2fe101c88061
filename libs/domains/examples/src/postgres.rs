use async_trait::async_trait;
use mockable::Clock;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    entity,
    error::{ExampleError, ExampleResult},
    models::{Example, storage_timestamp},
    repository::ExampleRepository,
};

/// PostgreSQL-backed repository over a SeaORM connection pool
pub struct PgExampleRepository {
    db: DatabaseConnection,
    clock: Arc<dyn Clock + Send + Sync>,
    closed: AtomicBool,
}

impl PgExampleRepository {
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            db,
            clock,
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self, operation: &'static str) -> ExampleResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ExampleError::persistence(operation, "connection pool is closed"));
        }
        Ok(())
    }
}

#[async_trait]
impl ExampleRepository for PgExampleRepository {
    async fn create(&self, mut example: Example) -> ExampleResult<Example> {
        self.ensure_open("create")?;

        let now = storage_timestamp(self.clock.utc());
        example.created_at = now;
        example.updated_at = now;

        let active_model: entity::ActiveModel = example.into();
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| ExampleError::persistence("create", e))?;

        tracing::debug!(example_id = model.id, "Inserted example row");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> ExampleResult<Option<Example>> {
        self.ensure_open("get")?;

        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ExampleError::persistence("get", e))?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, limit: u64, offset: u64) -> ExampleResult<Vec<Example>> {
        self.ensure_open("list")?;

        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|e| ExampleError::persistence("list", e))?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, example: Example) -> ExampleResult<Example> {
        self.ensure_open("update")?;

        let id = example.id;
        let changes = entity::ActiveModel {
            id: NotSet,
            name: Set(example.name),
            description: Set(example.description),
            value: Set(example.value),
            is_active: Set(example.is_active),
            created_at: NotSet,
            updated_at: Set(example.updated_at.into()),
        };

        // Single conditional statement: a row deleted since the caller's read
        // comes back as zero rows rather than an error.
        let mut updated = entity::Entity::update_many()
            .set(changes)
            .filter(entity::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| ExampleError::persistence("update", e))?;

        match updated.pop() {
            Some(model) => Ok(model.into()),
            None => Err(ExampleError::NotFound(id)),
        }
    }

    async fn delete(&self, id: i64) -> ExampleResult<()> {
        self.ensure_open("delete")?;

        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ExampleError::persistence("delete", e))?;

        if result.rows_affected == 0 {
            return Err(ExampleError::NotFound(id));
        }
        Ok(())
    }

    async fn close(&self) -> ExampleResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        database::postgres::close(self.db.clone())
            .await
            .map_err(|e| ExampleError::persistence("close", e))
    }
}
