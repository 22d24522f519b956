//! Cart service.
//!
//! Applies cart operations to the cart selected by [`CartScope`]: a single
//! process-wide cart, or one cart stored in each browser session.

use std::sync::Arc;

use minishop_core::{Cart, Catalog, Product, ProductId};
use tokio::sync::RwLock;
use tower_sessions::Session;

use crate::config::CartScope;
use crate::models::session_keys;

/// Cart operations for the configured scope.
///
/// Cheap to clone; clones share the process-wide cart.
#[derive(Debug, Clone)]
pub struct CartService {
    scope: CartScope,
    shared: Arc<RwLock<Cart>>,
}

impl CartService {
    #[must_use]
    pub fn new(scope: CartScope) -> Self {
        Self {
            scope,
            shared: Arc::new(RwLock::new(Cart::new())),
        }
    }

    /// Add a copy of the catalog product with this ID.
    ///
    /// Unknown IDs leave the cart unchanged and return `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cart cannot be read or written.
    pub async fn add(
        &self,
        session: &Session,
        catalog: &Catalog,
        id: ProductId,
    ) -> Result<Option<Product>, tower_sessions::session::Error> {
        self.update(session, |cart| cart.add(catalog, id).cloned())
            .await
    }

    /// Remove every entry with this ID. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cart cannot be read or written.
    pub async fn remove(
        &self,
        session: &Session,
        id: ProductId,
    ) -> Result<usize, tower_sessions::session::Error> {
        self.update(session, |cart| cart.remove_all(id)).await
    }

    /// Snapshot of the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cart cannot be read.
    pub async fn view(&self, session: &Session) -> Result<Cart, tower_sessions::session::Error> {
        match self.scope {
            CartScope::Shared => Ok(self.shared.read().await.clone()),
            CartScope::Session => load_session_cart(session).await,
        }
    }

    async fn update<R>(
        &self,
        session: &Session,
        apply: impl FnOnce(&mut Cart) -> R,
    ) -> Result<R, tower_sessions::session::Error> {
        match self.scope {
            CartScope::Shared => {
                let mut cart = self.shared.write().await;
                Ok(apply(&mut cart))
            }
            CartScope::Session => {
                let mut cart = load_session_cart(session).await?;
                let result = apply(&mut cart);
                session.insert(session_keys::CART, &cart).await?;
                Ok(result)
            }
        }
    }
}

async fn load_session_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}
