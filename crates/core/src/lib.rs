//! Minishop Core - Domain types shared by the storefront and its tests.
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no HTTP,
//! no session handling. The storefront decides where a [`Cart`] lives
//! (process-wide or per session); this crate only defines how it behaves.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, and the product record
//! - [`catalog`] - The immutable, ordered product catalog
//! - [`cart`] - The ordered list of product copies a shopper intends to buy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::Cart;
pub use catalog::{Catalog, CatalogError};
pub use types::*;
