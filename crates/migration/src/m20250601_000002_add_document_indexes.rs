//! Indexes backing the per-collection scans and owner lookups.
use sea_orm_migration::prelude::*;

use crate::m20250601_000001_create_document::Document;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_document_collection_created")
                    .table(Document::Table)
                    .col(Document::Collection)
                    .col(Document::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Owner / provider / user email lookups filter on JSONB fields
        let conn = manager.get_connection();
        for (name, field) in [
            ("idx_document_service_provider_email", "serviceProviderEmail"),
            ("idx_document_user_email", "userEmail"),
            ("idx_document_provider_email", "providerEmail"),
        ] {
            conn.execute_unprepared(&format!(
                "CREATE INDEX IF NOT EXISTS {name} ON document ((body ->> '{field}'))"
            ))
            .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        for name in [
            "idx_document_service_provider_email",
            "idx_document_user_email",
            "idx_document_provider_email",
        ] {
            conn.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}")).await?;
        }
        manager
            .drop_index(Index::drop().name("idx_document_collection_created").table(Document::Table).to_owned())
            .await
    }
}
