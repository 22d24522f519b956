//! The product catalog.
//!
//! An ordered, immutable list of products built once at startup and shared
//! by every request. Lookups are a linear scan; the catalog is small.

use std::sync::Arc;

use thiserror::Error;

use crate::types::{Price, Product, ProductId};

/// Errors from building or querying the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No product with this ID exists.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Product IDs must be positive.
    #[error("product id must be positive: {0}")]
    InvalidId(ProductId),

    /// Two products share an ID.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
}

/// Immutable, ordered product catalog.
///
/// Cheap to clone; all clones share the same product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Build a catalog from an ordered list of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidId` for non-positive IDs and
    /// `CatalogError::DuplicateId` if an ID appears twice.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        for (index, product) in products.iter().enumerate() {
            if product.id.as_i32() <= 0 {
                return Err(CatalogError::InvalidId(product.id));
            }
            if products
                .iter()
                .take(index)
                .any(|earlier| earlier.id == product.id)
            {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }

        Ok(Self {
            products: products.into(),
        })
    }

    /// The built-in demo catalog: three products priced 100, 200 and 300.
    ///
    /// # Panics
    ///
    /// Never in practice; the demo IDs are fixed, positive and distinct.
    #[must_use]
    pub fn demo() -> Self {
        let products = (1..=3)
            .map(|n: u16| {
                Product::new(
                    ProductId::new(i32::from(n)),
                    format!("Product {n}"),
                    Price::usd(u32::from(n) * 100),
                )
            })
            .collect::<Vec<_>>();

        Self::new(products).expect("demo catalog has distinct positive ids")
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Find a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has this ID.
    pub fn find(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or(CatalogError::ProductNotFound(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
