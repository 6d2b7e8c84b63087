use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{debug, info, instrument};

use super::domain::{AuthenticatedIdentity, Claims, IssuedToken, LoginInput};
use super::errors::AuthError;

/// Token service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self { jwt_secret: cfg.jwt_secret.clone(), token_ttl_secs: cfg.token_ttl_secs }
    }
}

/// Mints and verifies HS256 identity tokens. Holds no session state.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenService {
    pub fn new(cfg: AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            validation,
            ttl_secs: cfg.token_ttl_secs,
        }
    }

    /// Issue a token bound to the login email.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{TokenService, AuthConfig, domain::LoginInput};
    /// let svc = TokenService::new(AuthConfig { jwt_secret: "secret".into(), token_ttl_secs: 3600 });
    /// let issued = svc.issue(&LoginInput { email: "a@x.com".into() }).unwrap();
    /// let who = svc.verify(Some(&issued.token)).unwrap();
    /// assert_eq!(who.email, "a@x.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub fn issue(&self, input: &LoginInput) -> Result<IssuedToken, AuthError> {
        let email = input.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::Validation("a valid email is required".into()));
        }
        let now = Utc::now();
        let expires_at = i64::try_from(self.ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AuthError::TokenError("token ttl out of range".into()))?;
        let claims = Claims {
            email: email.to_string(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };
        let token = encode(&JwtHeader::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        info!(email = %claims.email, ttl_secs = self.ttl_secs, "token_issued");
        Ok(IssuedToken { token, expires_in_secs: self.ttl_secs })
    }

    /// Verify a presented token (if any) and recover the identity it carries.
    pub fn verify(&self, token: Option<&str>) -> Result<AuthenticatedIdentity, AuthError> {
        let token = match token {
            Some(t) if !t.trim().is_empty() => t.trim(),
            _ => return Err(AuthError::Unauthenticated),
        };
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!(err = %e, "token validation failed");
            AuthError::InvalidToken(e.to_string())
        })?;
        Ok(AuthenticatedIdentity::new(data.claims.email))
    }
}
