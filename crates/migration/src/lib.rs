//! Migrator registering the document store schema.
pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_document;
mod m20250601_000002_add_document_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_document::Migration),
            // Indexes should always be applied last
            Box::new(m20250601_000002_add_document_indexes::Migration),
        ]
    }
}
