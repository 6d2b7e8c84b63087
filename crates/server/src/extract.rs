//! Identity extraction for protected routes.

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use service::auth::{errors::AuthError, AuthenticatedIdentity, TokenService};
use service::errors::ServiceError;

use crate::errors::ApiError;

/// Name of the HTTP-only identity cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Verified caller identity. Extracting it runs token verification, so any
/// handler taking a `CurrentUser` is a protected route.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedIdentity);

/// Read `Authorization: Bearer <token>`, falling back to the `token` cookie.
fn presented_token(headers: &HeaderMap) -> Result<Option<String>, AuthError> {
    if let Some(authz) = headers.get(header::AUTHORIZATION) {
        let value = authz
            .to_str()
            .map_err(|_| AuthError::InvalidToken("non-ascii Authorization header".into()))?;
        return match value.strip_prefix("Bearer ") {
            Some(token) => Ok(Some(token.to_string())),
            None => Err(AuthError::InvalidToken("expected Bearer scheme".into())),
        };
    }
    let jar = CookieJar::from_headers(headers);
    Ok(jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()))
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        let identity = presented_token(&parts.headers)
            .and_then(|token| tokens.verify(token.as_deref()))
            .map_err(|e| {
                tracing::warn!(path = %parts.uri.path(), code = e.code(), err = %e, "token rejected");
                ApiError::from(ServiceError::from(e))
            })?;
        Ok(CurrentUser(identity))
    }
}
