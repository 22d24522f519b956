//! Domain models for storefront.
//!
//! Only session-scoped data lives here; products and carts come from
//! `minishop-core`.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
