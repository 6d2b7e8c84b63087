use async_trait::async_trait;
use models::document;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, Filter, StoreError, UpdateOutcome, ID_FIELD};

/// PostgreSQL-backed store; all collections share the JSONB `document` table.
pub struct SeaOrmDocumentStore {
    pub db: DatabaseConnection,
}

impl SeaOrmDocumentStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn into_document(collection: Collection, row: document::Model) -> Result<Document, StoreError> {
    let mut doc = match row.body {
        Value::Object(map) => map,
        other => {
            return Err(StoreError::Malformed {
                collection,
                reason: format!("document {} body is {}, expected object", row.id, kind_of(&other)),
            })
        }
    };
    doc.insert(ID_FIELD.to_string(), Value::String(row.id.to_string()));
    Ok(doc)
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows = document::find_matching(&self.db, collection.name(), filter.conditions()).await?;
        rows.into_iter().map(|row| into_document(collection, row)).collect()
    }

    async fn find_one(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, StoreError> {
        document::find_in_collection(&self.db, collection.name(), id)
            .await?
            .map(|row| into_document(collection, row))
            .transpose()
    }

    async fn insert_one(&self, collection: Collection, mut doc: Document) -> Result<Uuid, StoreError> {
        doc.remove(ID_FIELD);
        let created = document::create(&self.db, collection.name(), Value::Object(doc)).await?;
        Ok(created.id)
    }

    async fn update_one(&self, collection: Collection, id: Uuid, mut fields: Document) -> Result<UpdateOutcome, StoreError> {
        fields.remove(ID_FIELD);
        if document::find_in_collection(&self.db, collection.name(), id).await?.is_none() {
            return Ok(UpdateOutcome { matched: false, modified: false });
        }
        if fields.is_empty() {
            return Ok(UpdateOutcome { matched: true, modified: false });
        }
        let modified = document::merge_body(&self.db, collection.name(), id, Value::Object(fields)).await?;
        Ok(UpdateOutcome { matched: true, modified })
    }

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<bool, StoreError> {
        Ok(document::delete_in_collection(&self.db, collection.name(), id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;
    use serde_json::json;

    async fn connect() -> Option<SeaOrmDocumentStore> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return None; }
        let url = std::env::var("DATABASE_URL").ok()?;
        let cfg = configs::DatabaseConfig { url, ..Default::default() };
        let db = match models::db::connect(&cfg).await {
            Ok(db) => db,
            Err(e) => {
                eprintln!("skip: cannot connect to db: {}", e);
                return None;
            }
        };
        if let Err(e) = migration::Migrator::up(&db, None).await {
            eprintln!("skip: migrate up failed: {}", e);
            return None;
        }
        Some(SeaOrmDocumentStore::new(db))
    }

    #[test]
    fn non_object_body_is_malformed() {
        let row = document::Model {
            id: Uuid::new_v4(),
            collection: "services".into(),
            body: json!([1, 2]),
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        };
        let err = into_document(Collection::Services, row).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[tokio::test]
    async fn crud_against_postgres() -> Result<(), anyhow::Error> {
        let Some(store) = connect().await else { return Ok(()) };
        let owner = format!("p_{}@example.com", Uuid::new_v4());

        let body = json!({"serviceProviderEmail": owner, "title": "wash"}).as_object().cloned().unwrap();
        let id = store.insert_one(Collection::Services, body).await?;

        let found = store.find(Collection::Services, &Filter::eq("serviceProviderEmail", owner.clone())).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["_id"], json!(id.to_string()));

        let same = json!({"title": "wash"}).as_object().cloned().unwrap();
        assert!(!store.update_one(Collection::Services, id, same).await?.modified);
        let changed = json!({"title": "deep wash"}).as_object().cloned().unwrap();
        assert!(store.update_one(Collection::Services, id, changed).await?.modified);
        assert!(store.find_one(Collection::Bookings, id).await?.is_none());

        assert!(store.delete_one(Collection::Services, id).await?);
        assert!(store.find_one(Collection::Services, id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn merge_replaces_arrays_objects_and_types() -> Result<(), anyhow::Error> {
        let Some(store) = connect().await else { return Ok(()) };
        let body = json!({"title": "wash", "tags": ["a", "b"], "meta": {"x": 1, "y": 2}, "price": 20});
        let id = store.insert_one(Collection::Services, body.as_object().cloned().unwrap()).await?;
        let patch = |v: Value| v.as_object().cloned().unwrap();

        let out = store.update_one(Collection::Services, id, patch(json!({"tags": ["a"]}))).await?;
        assert_eq!(out, UpdateOutcome { matched: true, modified: true });
        let out = store.update_one(Collection::Services, id, patch(json!({"meta": {"x": 1}}))).await?;
        assert_eq!(out, UpdateOutcome { matched: true, modified: true });
        let out = store.update_one(Collection::Services, id, patch(json!({"price": "20"}))).await?;
        assert_eq!(out, UpdateOutcome { matched: true, modified: true });

        let stored = store.find_one(Collection::Services, id).await?.unwrap();
        assert_eq!(stored["tags"], json!(["a"]));
        assert_eq!(stored["meta"], json!({"x": 1}));
        assert_eq!(stored["price"], json!("20"));
        assert_eq!(stored["title"], json!("wash"));

        // the same values again change nothing
        let out = store
            .update_one(Collection::Services, id, patch(json!({"tags": ["a"], "meta": {"x": 1}})))
            .await?;
        assert_eq!(out, UpdateOutcome { matched: true, modified: false });

        store.delete_one(Collection::Services, id).await?;
        Ok(())
    }
}
