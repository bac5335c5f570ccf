//! Create `updates` table.
//!
//! One row per posted update; ids are opaque hex tokens shared with the
//! file-backed store, so the primary key is text rather than an integer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Updates::Table)
                    .if_not_exists()
                    .col(string_len(Updates::Id, 64).primary_key())
                    .col(string_len(Updates::Name, 128).not_null())
                    .col(text(Updates::Message).not_null())
                    .col(timestamp_with_time_zone(Updates::Timestamp).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Updates::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Updates { Table, Id, Name, Message, Timestamp }
