//! Cart route handlers.
//!
//! Add and remove are plain links that redirect back to a page, so they
//! work without JavaScript. Which cart they touch is decided by
//! [`CartService`](crate::services::CartService).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use minishop_core::Cart;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::found;
use crate::routes::products::{ProductPath, ProductView};
use crate::state::AppState;

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<ProductView>,
    pub total: String,
    pub item_count: usize,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(ProductView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.len(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub username: Option<String>,
    pub cart: CartView,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub username: Option<String>,
    pub cart: CartView,
}

/// Add a product to the cart and return to the catalog.
///
/// Unknown IDs leave the cart unchanged and still redirect.
///
/// # Errors
///
/// Returns an error if the session cart cannot be updated.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    ProductPath(id): ProductPath,
) -> Result<Response> {
    match state.carts().add(&session, state.catalog(), id).await? {
        Some(product) => {
            let product_id = product.id.to_string();
            tracing::info!(product_id = %product_id, "Added to cart");
            add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));
        }
        None => {
            tracing::debug!(product_id = %id, "Unknown product, cart unchanged");
        }
    }

    Ok(found("/"))
}

/// Remove every entry of a product and return to the cart page.
///
/// # Errors
///
/// Returns an error if the session cart cannot be updated.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    ProductPath(id): ProductPath,
) -> Result<Response> {
    let removed = state.carts().remove(&session, id).await?;

    let product_id = id.to_string();
    tracing::info!(product_id = %product_id, removed, "Removed from cart");
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", product_id.as_str())]),
    );

    Ok(found("/cart"))
}

/// Display the cart page.
///
/// # Errors
///
/// Returns an error if the session cart cannot be read.
#[instrument(skip(state, session, auth))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
) -> Result<impl IntoResponse> {
    let cart = state.carts().view(&session).await?;

    Ok(CartTemplate {
        username: auth.username(),
        cart: CartView::from(&cart),
    })
}

/// Display the order summary.
///
/// No payment is taken and the cart is left as it is.
///
/// # Errors
///
/// Returns an error if the session cart cannot be read.
#[instrument(skip(state, session, auth))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
) -> Result<impl IntoResponse> {
    let cart = state.carts().view(&session).await?;
    add_breadcrumb("checkout", "Viewed order summary", None);

    Ok(CheckoutTemplate {
        username: auth.username(),
        cart: CartView::from(&cart),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use minishop_core::{Catalog, ProductId};

    #[test]
    fn test_cart_view_totals() {
        let catalog = Catalog::demo();
        let mut cart = Cart::new();
        for id in [2, 3] {
            cart.add(&catalog, ProductId::new(id));
        }

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total, "$500.00");
        assert_eq!(view.items[0].name, "Product 2");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::new());
        assert!(view.items.is_empty());
        assert_eq!(view.total, "$0.00");
    }
}
