use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

use crate::entity::{LineItems, Products, Purchases, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Referenced tables first so foreign keys resolve.
        manager
            .create_table(create_table(&schema, Users))
            .await?;
        manager
            .create_table(create_table(&schema, Products))
            .await?;
        manager
            .create_table(create_table(&schema, Purchases))
            .await?;
        manager
            .create_table(create_table(&schema, LineItems))
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_line_items_purchase_id")
                    .table(LineItems)
                    .col(crate::entity::line_items::Column::PurchaseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in ["line_items", "purchases", "products", "users"] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

fn create_table<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    schema
        .create_table_from_entity(entity)
        .if_not_exists()
        .to_owned()
}
