//! Auth module: stateless token issue/verify and the ownership guard.
//!
//! A login yields a signed token bound to an email; every protected request
//! turns that token back into an [`domain::AuthenticatedIdentity`], which the
//! guard then compares against resource owners.

pub mod domain;
pub mod errors;
pub mod guard;
pub mod service;

pub use domain::AuthenticatedIdentity;
pub use service::{AuthConfig, TokenService};
