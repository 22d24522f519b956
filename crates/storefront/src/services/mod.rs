//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Username/password verification behind [`auth::CredentialVerifier`]
//! - `cart` - Cart add/remove/view for the configured [`crate::config::CartScope`]

pub mod auth;
pub mod cart;

pub use auth::{AuthError, CredentialVerifier, StaticCredentials};
pub use cart::CartService;
