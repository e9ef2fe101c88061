use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::Example;

/// Sea-ORM Entity for the examples table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "examples")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub value: f64,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Example {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            value: model.value,
            is_active: model.is_active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Insert form: the id is left to the sequence.
impl From<Example> for ActiveModel {
    fn from(example: Example) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(example.name),
            description: Set(example.description),
            value: Set(example.value),
            is_active: Set(example.is_active),
            created_at: Set(example.created_at.into()),
            updated_at: Set(example.updated_at.into()),
        }
    }
}
