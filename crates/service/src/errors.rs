use thiserror::Error;

use crate::auth::errors::AuthError;
use crate::store::StoreError;

/// Business errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Unauthenticated => 1004,
            ServiceError::InvalidToken(_) => 1005,
            ServiceError::Forbidden(_) => 1006,
            ServiceError::Internal(_) => 1100,
            ServiceError::Store(_) => 1200,
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ServiceError::BadRequest(msg),
            AuthError::Unauthenticated => ServiceError::Unauthenticated,
            AuthError::InvalidToken(msg) => ServiceError::InvalidToken(msg),
            AuthError::TokenError(msg) => ServiceError::Internal(msg),
        }
    }
}
