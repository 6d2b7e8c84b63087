//! Service layer for the booking marketplace.
//! - Business rules (ownership, no-op detection) live here, independent of HTTP.
//! - Persistence goes through the injected [`store::DocumentStore`].

pub mod auth;
pub mod booking_service;
pub mod catalog_service;
pub mod domain;
pub mod errors;
pub mod store;
pub mod user_service;

pub use booking_service::BookingService;
pub use catalog_service::ServiceCatalog;
pub use user_service::UserService;
