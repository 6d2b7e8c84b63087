//! Ownership predicates. Both run after token verification and before any
//! mutation or scoped read.

use tracing::warn;

use super::domain::AuthenticatedIdentity;
use crate::errors::ServiceError;

/// Allow the request only when the caller owns the resource.
pub fn authorize_owner(identity: &AuthenticatedIdentity, resource_owner_email: Option<&str>) -> Result<(), ServiceError> {
    match resource_owner_email {
        Some(owner) if owner == identity.email => Ok(()),
        owner => {
            warn!(caller = %identity.email, owner = owner.unwrap_or("<none>"), "ownership check failed");
            Err(ServiceError::Forbidden("caller does not own this resource".into()))
        }
    }
}

/// Allow a scoped read only when the requested email is the caller's own.
pub fn authorize_self(identity: &AuthenticatedIdentity, requested_email: Option<&str>) -> Result<(), ServiceError> {
    match requested_email.map(str::trim) {
        Some(email) if !email.is_empty() && email == identity.email => Ok(()),
        requested => {
            warn!(caller = %identity.email, requested = requested.unwrap_or("<none>"), "scoped read denied");
            Err(ServiceError::Forbidden("unauthorized access".into()))
        }
    }
}
