use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::SameSite;
use service::auth::{AuthConfig, TokenService};
use service::store::DocumentStore;
use service::{BookingService, ServiceCatalog, UserService};

use crate::errors::StartupError;

/// Attributes applied to the identity cookie.
#[derive(Clone, Copy, Debug)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    pub fn from_config(cfg: &configs::AuthConfig) -> Result<Self, StartupError> {
        let same_site = match cfg.cookie_same_site.to_ascii_lowercase().as_str() {
            "none" => SameSite::None,
            "lax" => SameSite::Lax,
            "strict" => SameSite::Strict,
            other => return Err(StartupError::InvalidConfig(format!("unknown cookie_same_site: {other}"))),
        };
        Ok(Self { secure: cfg.cookie_secure, same_site })
    }
}

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub cookies: CookiePolicy,
    pub catalog: Arc<ServiceCatalog>,
    pub bookings: Arc<BookingService>,
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, auth: &configs::AuthConfig) -> Result<Self, StartupError> {
        Ok(Self {
            tokens: Arc::new(TokenService::new(AuthConfig::from(auth))),
            cookies: CookiePolicy::from_config(auth)?,
            catalog: Arc::new(ServiceCatalog::new(Arc::clone(&store))),
            bookings: Arc::new(BookingService::new(Arc::clone(&store))),
            users: Arc::new(UserService::new(store)),
        })
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}
