//! Schema migrations.
//!
//! Tables are derived from the sea-orm entities so the same migration runs
//! on Postgres in production and on SQLite in tests.

use sea_orm_migration::prelude::*;

mod m20240601_000001_create_lists;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240601_000001_create_lists::Migration)]
    }
}
