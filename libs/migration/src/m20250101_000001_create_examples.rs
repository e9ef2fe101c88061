use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Examples::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Examples::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Examples::Name, 255))
                    .col(text(Examples::Description).default(""))
                    .col(double(Examples::Value).check(Expr::col(Examples::Value).gte(0)))
                    .col(boolean(Examples::IsActive).default(true))
                    .col(
                        timestamp_with_time_zone(Examples::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Examples::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_examples_created_at")
                    .table(Examples::Table)
                    .col(Examples::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Examples::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Examples {
    Table,
    Id,
    Name,
    Description,
    Value,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
