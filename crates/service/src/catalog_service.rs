//! Service listings: public reads, owner-only mutation.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{guard, AuthenticatedIdentity};
use crate::domain::{fields, into_document, str_field, InsertResult, Mutation};
use crate::errors::ServiceError;
use crate::store::{Collection, Document, DocumentStore, Filter};

/// Application service over the `services` collection.
pub struct ServiceCatalog {
    store: Arc<dyn DocumentStore>,
}

impl ServiceCatalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    pub async fn list_all(&self) -> Result<Vec<Document>, ServiceError> {
        Ok(self.store.find(Collection::Services, &Filter::all()).await?)
    }

    /// Services owned by `email`, which must be the caller's own.
    #[instrument(skip(self, identity), fields(caller = %identity.email))]
    pub async fn list_by_provider(&self, identity: &AuthenticatedIdentity, email: Option<&str>) -> Result<Vec<Document>, ServiceError> {
        guard::authorize_self(identity, email)?;
        let filter = Filter::eq(fields::SERVICE_PROVIDER_EMAIL, identity.email.as_str());
        Ok(self.store.find(Collection::Services, &filter).await?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Document, ServiceError> {
        self.store
            .find_one(Collection::Services, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("service"))
    }

    /// Store a new listing owned by the caller. Owner and id in the payload are ignored.
    #[instrument(skip(self, identity, payload), fields(caller = %identity.email))]
    pub async fn create(&self, identity: &AuthenticatedIdentity, payload: Value) -> Result<InsertResult, ServiceError> {
        let mut doc = into_document(payload, "service")?;
        doc.remove(fields::ID);
        doc.insert(fields::SERVICE_PROVIDER_EMAIL.to_string(), Value::String(identity.email.clone()));
        let id = self.store.insert_one(Collection::Services, doc).await?;
        info!(service_id = %id, provider = %identity.email, "service_created");
        Ok(InsertResult::new(id))
    }

    /// Partial update by the owning provider; `_id` and owner are not writable.
    #[instrument(skip(self, identity, payload), fields(caller = %identity.email, service_id = %id))]
    pub async fn update(&self, identity: &AuthenticatedIdentity, id: Uuid, payload: Value) -> Result<Mutation, ServiceError> {
        let mut patch = into_document(payload, "service")?;
        patch.remove(fields::ID);
        patch.remove(fields::SERVICE_PROVIDER_EMAIL);

        let existing = self.get_by_id(id).await?;
        guard::authorize_owner(identity, str_field(&existing, fields::SERVICE_PROVIDER_EMAIL))?;

        if patch.is_empty() {
            return Ok(Mutation::Unchanged);
        }
        let outcome = self.store.update_one(Collection::Services, id, patch).await?;
        if !outcome.matched {
            return Err(ServiceError::not_found("service"));
        }
        if outcome.modified {
            info!(service_id = %id, "service_updated");
            Ok(Mutation::Applied)
        } else {
            Ok(Mutation::Unchanged)
        }
    }

    #[instrument(skip(self, identity), fields(caller = %identity.email, service_id = %id))]
    pub async fn delete(&self, identity: &AuthenticatedIdentity, id: Uuid) -> Result<(), ServiceError> {
        let existing = self.get_by_id(id).await?;
        guard::authorize_owner(identity, str_field(&existing, fields::SERVICE_PROVIDER_EMAIL))?;
        if !self.store.delete_one(Collection::Services, id).await? {
            return Err(ServiceError::not_found("service"));
        }
        info!(service_id = %id, "service_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new(Arc::new(MemoryDocumentStore::new()))
    }

    fn who(email: &str) -> AuthenticatedIdentity { AuthenticatedIdentity::new(email) }

    #[tokio::test]
    async fn create_then_get_returns_submitted_fields_and_id() -> Result<(), anyhow::Error> {
        let c = catalog();
        let created = c
            .create(&who("a@x.com"), json!({"serviceProviderEmail": "a@x.com", "title": "wash", "price": 20}))
            .await?;
        let got = c.get_by_id(created.inserted_id).await?;
        assert_eq!(got["_id"], json!(created.inserted_id.to_string()));
        assert_eq!(got["title"], json!("wash"));
        assert_eq!(got["price"], json!(20));
        assert_eq!(got["serviceProviderEmail"], json!("a@x.com"));
        Ok(())
    }

    #[tokio::test]
    async fn create_stamps_owner_from_identity() -> Result<(), anyhow::Error> {
        let c = catalog();
        let created = c.create(&who("a@x.com"), json!({"serviceProviderEmail": "b@x.com", "title": "t"})).await?;
        let got = c.get_by_id(created.inserted_id).await?;
        assert_eq!(got["serviceProviderEmail"], json!("a@x.com"));
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_non_object() {
        let err = catalog().create(&who("a@x.com"), json!("wash")).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn only_owner_may_update() -> Result<(), anyhow::Error> {
        let c = catalog();
        let s1 = c.create(&who("a@x.com"), json!({"title": "wash"})).await?.inserted_id;

        let err = c.update(&who("b@x.com"), s1, json!({"title": "stolen"})).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        assert_eq!(c.get_by_id(s1).await?["title"], json!("wash"));

        assert_eq!(c.update(&who("a@x.com"), s1, json!({"title": "deep wash"})).await?, Mutation::Applied);
        assert_eq!(c.get_by_id(s1).await?["title"], json!("deep wash"));
        Ok(())
    }

    #[tokio::test]
    async fn unchanged_payload_is_a_no_op() -> Result<(), anyhow::Error> {
        let c = catalog();
        let s1 = c.create(&who("a@x.com"), json!({"title": "wash", "price": 5})).await?.inserted_id;
        assert_eq!(c.update(&who("a@x.com"), s1, json!({"title": "wash"})).await?, Mutation::Unchanged);
        assert_eq!(c.update(&who("a@x.com"), s1, json!({})).await?, Mutation::Unchanged);
        Ok(())
    }

    #[tokio::test]
    async fn update_cannot_reassign_owner_or_id() -> Result<(), anyhow::Error> {
        let c = catalog();
        let s1 = c.create(&who("a@x.com"), json!({"title": "wash"})).await?.inserted_id;
        let out = c
            .update(&who("a@x.com"), s1, json!({"_id": "x", "serviceProviderEmail": "b@x.com"}))
            .await?;
        assert_eq!(out, Mutation::Unchanged);
        let got = c.get_by_id(s1).await?;
        assert_eq!(got["serviceProviderEmail"], json!("a@x.com"));
        assert_eq!(got["_id"], json!(s1.to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn missing_service_is_not_found_before_ownership() {
        let c = catalog();
        let id = Uuid::new_v4();
        assert!(matches!(c.get_by_id(id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(c.update(&who("a@x.com"), id, json!({"t": 1})).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(c.delete(&who("a@x.com"), id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn only_owner_may_delete() -> Result<(), anyhow::Error> {
        let c = catalog();
        let s1 = c.create(&who("a@x.com"), json!({"title": "wash"})).await?.inserted_id;
        assert!(matches!(c.delete(&who("b@x.com"), s1).await, Err(ServiceError::Forbidden(_))));
        c.delete(&who("a@x.com"), s1).await?;
        assert!(matches!(c.get_by_id(s1).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn list_by_provider_returns_exactly_own_services() -> Result<(), anyhow::Error> {
        let c = catalog();
        c.create(&who("p@x.com"), json!({"title": "one"})).await?;
        c.create(&who("q@x.com"), json!({"title": "two"})).await?;
        c.create(&who("p@x.com"), json!({"title": "three"})).await?;

        let mine = c.list_by_provider(&who("p@x.com"), Some("p@x.com")).await?;
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|d| d["serviceProviderEmail"] == json!("p@x.com")));
        assert_eq!(c.list_all().await?.len(), 3);

        let err = c.list_by_provider(&who("p@x.com"), Some("q@x.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        let err = c.list_by_provider(&who("p@x.com"), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
        Ok(())
    }
}
