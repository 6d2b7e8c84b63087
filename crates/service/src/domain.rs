//! Canonical document schema shared by the catalog and booking services.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::store::Document;

/// Field names used across collections.
pub mod fields {
    pub const ID: &str = crate::store::ID_FIELD;
    pub const SERVICE_PROVIDER_EMAIL: &str = "serviceProviderEmail";
    pub const SERVICE_ID: &str = "serviceId";
    pub const USER_EMAIL: &str = "userEmail";
    pub const PROVIDER_EMAIL: &str = "providerEmail";
    pub const SERVICE_STATUS: &str = "serviceStatus";
}

pub const DEFAULT_BOOKING_STATUS: &str = "pending";

/// Outcome of an update that may legitimately change nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    Unchanged,
}

/// Body returned after an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

impl InsertResult {
    pub fn new(inserted_id: Uuid) -> Self { Self { acknowledged: true, inserted_id } }
}

/// Accept only JSON objects as document payloads.
pub fn into_document(payload: Value, what: &str) -> Result<Document, ServiceError> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(ServiceError::BadRequest(format!("{what} payload must be a JSON object"))),
    }
}

/// Read a string field, treating blanks as absent.
pub fn str_field<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}
