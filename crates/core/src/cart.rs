//! Shopping cart.
//!
//! A cart is an ordered list of product copies. Adding the same product
//! twice yields two entries; removing a product drops every entry with
//! that ID.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::types::{Price, Product, ProductId};

/// Items a shopper intends to buy, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a copy of the catalog product with this ID.
    ///
    /// Unknown IDs leave the cart unchanged. Returns the product that was
    /// added, if any.
    pub fn add<'c>(&mut self, catalog: &'c Catalog, id: ProductId) -> Option<&'c Product> {
        let product = catalog.find(id).ok()?;
        self.items.push(product.clone());
        Some(product)
    }

    /// Remove every entry with this ID. Returns how many were removed.
    pub fn remove_all(&mut self, id: ProductId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before - self.items.len()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all entry prices. An empty cart totals zero.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(cart: &Cart) -> Vec<i32> {
        cart.items().iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_add_known_product_appends_copy() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();

        let added = cart.add(&catalog, ProductId::new(2)).unwrap();
        assert_eq!(added.name, "Product 2");
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0], *catalog.find(ProductId::new(2)).unwrap());
    }

    #[test]
    fn test_add_unknown_product_is_noop() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add(&catalog, ProductId::new(1));

        assert!(cart.add(&catalog, ProductId::new(42)).is_none());
        assert_eq!(ids(&cart), vec![1]);
    }

    #[test]
    fn test_duplicates_allowed() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        cart.add(&catalog, ProductId::new(1));
        cart.add(&catalog, ProductId::new(1));

        assert_eq!(ids(&cart), vec![1, 1]);
    }

    #[test]
    fn test_remove_all_matching_entries() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        for id in [1, 2, 1, 3, 1] {
            cart.add(&catalog, ProductId::new(id));
        }

        assert_eq!(cart.remove_all(ProductId::new(1)), 3);
        assert_eq!(ids(&cart), vec![2, 3]);

        // Idempotent
        assert_eq!(cart.remove_all(ProductId::new(1)), 0);
        assert_eq!(ids(&cart), vec![2, 3]);
    }

    #[test]
    fn test_add_three_remove_first_keeps_order() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        for id in [1, 2, 3] {
            cart.add(&catalog, ProductId::new(id));
        }
        assert_eq!(cart.len(), 3);

        cart.remove_all(ProductId::new(1));
        assert_eq!(cart.len(), 2);
        assert_eq!(ids(&cart), vec![2, 3]);
    }

    #[test]
    fn test_total() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Price::usd(0));

        for id in [1, 3, 3] {
            cart.add(&catalog, ProductId::new(id));
        }
        assert_eq!(cart.total(), Price::usd(700));
        assert_eq!(cart.total().to_string(), "$700.00");
    }

    #[test]
    fn test_serde_roundtrip_preserves_order() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        for id in [3, 1] {
            cart.add(&catalog, ProductId::new(id));
        }

        let json = serde_json::to_value(&cart).unwrap();
        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }
}
