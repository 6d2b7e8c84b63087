//! Bookings: any authenticated user may book; only the provider moves status.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{guard, AuthenticatedIdentity};
use crate::domain::{fields, into_document, str_field, InsertResult, Mutation, DEFAULT_BOOKING_STATUS};
use crate::errors::ServiceError;
use crate::store::{Collection, Document, DocumentStore, Filter};

/// Application service over the `bookings` collection.
pub struct BookingService {
    store: Arc<dyn DocumentStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self { Self { store } }

    /// Record a booking for the caller.
    ///
    /// When `serviceId` names a stored service the provider is taken from that
    /// service; otherwise `providerEmail` must be supplied.
    #[instrument(skip(self, identity, payload), fields(caller = %identity.email))]
    pub async fn create(&self, identity: &AuthenticatedIdentity, payload: Value) -> Result<InsertResult, ServiceError> {
        let mut doc = into_document(payload, "booking")?;
        doc.remove(fields::ID);

        let provider = match str_field(&doc, fields::SERVICE_ID) {
            Some(raw) => {
                let service_id = Uuid::parse_str(raw)
                    .map_err(|_| ServiceError::BadRequest(format!("invalid serviceId: {raw}")))?;
                let service = self
                    .store
                    .find_one(Collection::Services, service_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("service"))?;
                str_field(&service, fields::SERVICE_PROVIDER_EMAIL)
                    .map(str::to_string)
                    .ok_or_else(|| ServiceError::Internal(format!("service {service_id} has no provider")))?
            }
            None => str_field(&doc, fields::PROVIDER_EMAIL)
                .map(str::to_string)
                .ok_or_else(|| ServiceError::BadRequest("providerEmail is required".into()))?,
        };

        doc.insert(fields::USER_EMAIL.to_string(), Value::String(identity.email.clone()));
        doc.insert(fields::PROVIDER_EMAIL.to_string(), Value::String(provider.clone()));
        if str_field(&doc, fields::SERVICE_STATUS).is_none() {
            doc.insert(fields::SERVICE_STATUS.to_string(), Value::String(DEFAULT_BOOKING_STATUS.to_string()));
        }

        let id = self.store.insert_one(Collection::Bookings, doc).await?;
        info!(booking_id = %id, user = %identity.email, provider = %provider, "booking_created");
        Ok(InsertResult::new(id))
    }

    /// Bookings the caller made.
    pub async fn list_by_user(&self, identity: &AuthenticatedIdentity, email: Option<&str>) -> Result<Vec<Document>, ServiceError> {
        guard::authorize_self(identity, email)?;
        let filter = Filter::eq(fields::USER_EMAIL, identity.email.as_str());
        Ok(self.store.find(Collection::Bookings, &filter).await?)
    }

    /// Bookings awaiting the caller as provider.
    pub async fn list_by_provider(&self, identity: &AuthenticatedIdentity, email: Option<&str>) -> Result<Vec<Document>, ServiceError> {
        guard::authorize_self(identity, email)?;
        let filter = Filter::eq(fields::PROVIDER_EMAIL, identity.email.as_str());
        Ok(self.store.find(Collection::Bookings, &filter).await?)
    }

    #[instrument(skip(self, identity), fields(caller = %identity.email, booking_id = %id))]
    pub async fn update_status(
        &self,
        identity: &AuthenticatedIdentity,
        id: Uuid,
        new_status: Option<&str>,
    ) -> Result<Mutation, ServiceError> {
        let status = new_status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::BadRequest("Status is required".into()))?;

        let booking = self
            .store
            .find_one(Collection::Bookings, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;
        guard::authorize_owner(identity, str_field(&booking, fields::PROVIDER_EMAIL))?;

        let mut patch = Document::new();
        patch.insert(fields::SERVICE_STATUS.to_string(), Value::String(status.to_string()));
        let outcome = self.store.update_one(Collection::Bookings, id, patch).await?;
        if !outcome.matched {
            return Err(ServiceError::not_found("booking"));
        }
        if outcome.modified {
            info!(booking_id = %id, status, "booking_status_updated");
            Ok(Mutation::Applied)
        } else {
            Ok(Mutation::Unchanged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    fn who(email: &str) -> AuthenticatedIdentity { AuthenticatedIdentity::new(email) }

    fn setup() -> (Arc<MemoryDocumentStore>, BookingService) {
        let store = Arc::new(MemoryDocumentStore::new());
        let svc = BookingService::new(store.clone());
        (store, svc)
    }

    async fn book(svc: &BookingService, user: &str, provider: &str) -> Uuid {
        svc.create(&who(user), json!({"providerEmail": provider, "serviceName": "wash"}))
            .await
            .unwrap()
            .inserted_id
    }

    #[tokio::test]
    async fn create_stamps_user_and_default_status() -> Result<(), anyhow::Error> {
        let (store, svc) = setup();
        let id = svc
            .create(&who("u@x.com"), json!({"providerEmail": "p@x.com", "userEmail": "someone@else.com"}))
            .await?
            .inserted_id;
        let doc = store.find_one(Collection::Bookings, id).await?.unwrap();
        assert_eq!(doc["userEmail"], json!("u@x.com"));
        assert_eq!(doc["providerEmail"], json!("p@x.com"));
        assert_eq!(doc["serviceStatus"], json!("pending"));
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_provider() {
        let (_, svc) = setup();
        let err = svc.create(&who("u@x.com"), json!({"serviceName": "wash"})).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn create_resolves_provider_from_service() -> Result<(), anyhow::Error> {
        let (store, svc) = setup();
        let service_doc = json!({"serviceProviderEmail": "owner@x.com", "title": "wash"});
        let service_id = store
            .insert_one(Collection::Services, service_doc.as_object().cloned().unwrap())
            .await?;

        let id = svc
            .create(&who("u@x.com"), json!({"serviceId": service_id.to_string(), "providerEmail": "liar@x.com"}))
            .await?
            .inserted_id;
        let doc = store.find_one(Collection::Bookings, id).await?.unwrap();
        assert_eq!(doc["providerEmail"], json!("owner@x.com"));

        let err = svc
            .create(&who("u@x.com"), json!({"serviceId": Uuid::new_v4().to_string()}))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let err = svc.create(&who("u@x.com"), json!({"serviceId": "nope"})).await.unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));
        Ok(())
    }

    #[tokio::test]
    async fn scoped_lists_return_exactly_own_bookings() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        book(&svc, "u@x.com", "p@x.com").await;
        book(&svc, "v@x.com", "p@x.com").await;
        book(&svc, "u@x.com", "q@x.com").await;

        let mine = svc.list_by_user(&who("u@x.com"), Some("u@x.com")).await?;
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|d| d["userEmail"] == json!("u@x.com")));

        let queue = svc.list_by_provider(&who("p@x.com"), Some("p@x.com")).await?;
        assert_eq!(queue.len(), 2);
        assert!(queue.iter().all(|d| d["providerEmail"] == json!("p@x.com")));

        assert!(matches!(
            svc.list_by_user(&who("u@x.com"), Some("v@x.com")).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            svc.list_by_provider(&who("u@x.com"), Some("p@x.com")).await,
            Err(ServiceError::Forbidden(_))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn only_provider_may_update_status() -> Result<(), anyhow::Error> {
        let (store, svc) = setup();
        let id = book(&svc, "u@x.com", "p@x.com").await;

        // the booking user is not the provider
        assert!(matches!(
            svc.update_status(&who("u@x.com"), id, Some("completed")).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert_eq!(svc.update_status(&who("p@x.com"), id, Some("working")).await?, Mutation::Applied);
        let doc = store.find_one(Collection::Bookings, id).await?.unwrap();
        assert_eq!(doc["serviceStatus"], json!("working"));
        Ok(())
    }

    #[tokio::test]
    async fn same_status_is_a_no_op() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let id = book(&svc, "u@x.com", "p@x.com").await;
        assert_eq!(svc.update_status(&who("p@x.com"), id, Some("pending")).await?, Mutation::Unchanged);
        Ok(())
    }

    #[tokio::test]
    async fn status_checks_run_in_order() -> Result<(), anyhow::Error> {
        let (_, svc) = setup();
        let id = book(&svc, "u@x.com", "p@x.com").await;
        assert!(matches!(svc.update_status(&who("p@x.com"), id, None).await, Err(ServiceError::BadRequest(_))));
        assert!(matches!(svc.update_status(&who("p@x.com"), id, Some(" ")).await, Err(ServiceError::BadRequest(_))));
        assert!(matches!(
            svc.update_status(&who("p@x.com"), Uuid::new_v4(), Some("done")).await,
            Err(ServiceError::NotFound(_))
        ));
        Ok(())
    }
}
