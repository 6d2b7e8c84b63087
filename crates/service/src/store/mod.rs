//! Document store abstraction.
//!
//! Handlers talk to a store through [`DocumentStore`], a small find / insert /
//! update / delete surface over three named collections. Documents are JSON
//! objects; the store owns the `_id` field.

pub mod memory;
pub mod seaorm;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryDocumentStore;
pub use seaorm::SeaOrmDocumentStore;

/// A schemaless JSON document.
pub type Document = Map<String, Value>;

/// Key holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Services,
    Bookings,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Services => "services",
            Collection::Bookings => "bookings",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Conjunction of top-level string equality conditions. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    pub fn all() -> Self { Self::default() }

    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::all().and_eq(field, value)
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, String)] { &self.conditions }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| doc.get(field).and_then(Value::as_str) == Some(value.as_str()))
    }
}

/// Result of a partial update, mirroring matched/modified counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: bool,
    pub modified: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("malformed document in {collection}: {reason}")]
    Malformed { collection: Collection, reason: String },
}

impl From<models::errors::ModelError> for StoreError {
    fn from(e: models::errors::ModelError) -> Self { StoreError::Backend(e.to_string()) }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError>;
    async fn find_one(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, StoreError>;
    /// Store `doc` under a freshly generated id; any `_id` in `doc` is discarded.
    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<Uuid, StoreError>;
    /// Shallow `$set` of `fields` onto the document. `_id` is never overwritten.
    async fn update_one(&self, collection: Collection, id: Uuid, fields: Document) -> Result<UpdateOutcome, StoreError>;
    async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::all().matches(&doc(json!({"a": 1}))));
    }

    #[test]
    fn filter_requires_exact_string_match_on_every_condition() {
        let d = doc(json!({"userEmail": "u@x.com", "providerEmail": "p@x.com", "price": 10}));
        assert!(Filter::eq("userEmail", "u@x.com").matches(&d));
        assert!(Filter::eq("userEmail", "u@x.com").and_eq("providerEmail", "p@x.com").matches(&d));
        assert!(!Filter::eq("userEmail", "U@x.com").matches(&d));
        assert!(!Filter::eq("userEmail", "u@x.com").and_eq("providerEmail", "q@x.com").matches(&d));
        assert!(!Filter::eq("missing", "x").matches(&d));
        // non-string fields never match a string condition
        assert!(!Filter::eq("price", "10").matches(&d));
    }
}
