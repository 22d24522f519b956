//! Application state shared across handlers.

use std::sync::Arc;

use minishop_core::Catalog;

use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::services::{CartService, CredentialVerifier, StaticCredentials};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the cart service, the credential verifier and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    carts: CartService,
    credentials: Arc<dyn CredentialVerifier>,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state with the demo catalog and the
    /// configured user table.
    ///
    /// # Errors
    ///
    /// Returns an error if the content pages cannot be loaded.
    pub fn new(config: StorefrontConfig) -> Result<Self, ContentError> {
        let credentials = Arc::new(StaticCredentials::new(config.users.clone()));
        Self::with_verifier(config, Catalog::demo(), credentials)
    }

    /// Create application state with an explicit catalog and credential
    /// verifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the content pages cannot be loaded.
    pub fn with_verifier(
        config: StorefrontConfig,
        catalog: Catalog,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Result<Self, ContentError> {
        let content = match &config.content_dir {
            Some(dir) => ContentStore::load(dir)?,
            None => ContentStore::builtin()?,
        };
        let carts = CartService::new(config.cart_scope);

        tracing::info!(
            products = catalog.len(),
            cart_scope = ?config.cart_scope,
            "Application state initialized"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
                credentials,
                content,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    #[must_use]
    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }

    /// Get the credential verifier used by the login route.
    #[must_use]
    pub fn credentials(&self) -> &dyn CredentialVerifier {
        self.inner.credentials.as_ref()
    }

    /// Get a reference to the markdown content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
