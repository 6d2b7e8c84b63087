use serde::{Deserialize, Serialize};

/// Login input. Only the email is bound into the token; other profile
/// fields sent by clients are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub email: String,
}

impl AuthenticatedIdentity {
    pub fn new(email: impl Into<String>) -> Self { Self { email: email.into() } }
}

/// JWT claims carried by the `token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// A freshly minted token and its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in_secs: u64,
}
