use thiserror::Error;

/// Errors raised while issuing or verifying identity tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("no token presented")]
    Unauthenticated,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token error: {0}")]
    TokenError(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Unauthenticated => 1004,
            AuthError::InvalidToken(_) => 1005,
            AuthError::TokenError(_) => 1102,
        }
    }
}
