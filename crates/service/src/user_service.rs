use std::sync::Arc;

use crate::errors::ServiceError;
use crate::store::{Collection, Document, DocumentStore, Filter};

/// Fields never returned from the public user listing.
pub const REDACTED_FIELDS: &[&str] = &["password", "passwordHash", "token"];

/// Read-only access to the `users` collection.
pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    /// Every user record with credential fields removed.
    pub async fn list_all(&self) -> Result<Vec<Document>, ServiceError> {
        let mut users = self.store.find(Collection::Users, &Filter::all()).await?;
        for user in &mut users {
            for field in REDACTED_FIELDS {
                user.remove(*field);
            }
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use serde_json::json;
    use uuid::Uuid;

    #[tokio::test]
    async fn list_all_strips_credentials_only() -> Result<(), anyhow::Error> {
        let store = Arc::new(MemoryDocumentStore::new());
        let doc = json!({"email": "a@x.com", "name": "A", "password": "hunter2", "passwordHash": "$argon2"});
        store.insert_with_id(Collection::Users, Uuid::new_v4(), doc.as_object().cloned().unwrap()).await;

        let users = UserService::new(store).list_all().await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["email"], json!("a@x.com"));
        assert_eq!(users[0]["name"], json!("A"));
        assert!(users[0].get("password").is_none());
        assert!(users[0].get("passwordHash").is_none());
        assert!(users[0].get("_id").is_some());
        Ok(())
    }
}
