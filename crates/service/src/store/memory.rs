use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore, Filter, StoreError, UpdateOutcome, ID_FIELD};

/// Process-local store keeping each collection in insertion order.
///
/// Used by tests and by `memory://` deployments; contents are lost on exit.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Insert a document with a caller-chosen id (seeding fixtures such as users).
    pub async fn insert_with_id(&self, collection: Collection, id: Uuid, mut doc: Document) {
        doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        let mut map = self.inner.write().await;
        map.entry(collection).or_default().push(doc);
    }
}

fn has_id(doc: &Document, id: Uuid) -> bool {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        == Some(id)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let map = self.inner.read().await;
        Ok(map
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, StoreError> {
        let map = self.inner.read().await;
        Ok(map
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)))
            .cloned())
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.insert_with_id(collection, id, doc).await;
        Ok(id)
    }

    async fn update_one(&self, collection: Collection, id: Uuid, fields: Document) -> Result<UpdateOutcome, StoreError> {
        let mut map = self.inner.write().await;
        let Some(target) = map
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, id)))
        else {
            return Ok(UpdateOutcome { matched: false, modified: false });
        };

        let mut modified = false;
        for (key, value) in fields {
            if key == ID_FIELD {
                continue;
            }
            if target.get(&key) != Some(&value) {
                target.insert(key, value);
                modified = true;
            }
        }
        Ok(UpdateOutcome { matched: true, modified })
    }

    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<bool, StoreError> {
        let mut map = self.inner.write().await;
        let Some(docs) = map.get_mut(&collection) else { return Ok(false) };
        let before = docs.len();
        docs.retain(|d| !has_id(d, id));
        Ok(docs.len() != before)
    }
}
