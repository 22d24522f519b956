//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog (home page)
//! GET  /product/{id}           - Product detail
//!
//! # Cart
//! GET  /add_to_cart/{id}       - Add product, redirect to /
//! GET  /remove_from_cart/{id}  - Remove every entry of product, redirect to /cart
//! GET  /cart                   - Cart page
//! GET  /checkout               - Order summary
//!
//! # Content
//! GET  /description            - About page
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /logout                 - Logout action
//! ```
//!
//! The cart mutation and logout routes also accept POST.

pub mod auth;
pub mod cart;
pub mod home;
pub mod pages;
pub mod products;

use axum::{
    Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use crate::state::AppState;

/// `302 Found` redirect.
///
/// axum's `Redirect::to` answers `303 See Other`; links and forms in the
/// storefront expect a plain `302`.
pub(crate) fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add_to_cart/{id}", get(cart::add).post(cart::add))
        .route("/remove_from_cart/{id}", get(cart::remove).post(cart::remove))
        .route("/cart", get(cart::show))
        .route("/checkout", get(cart::checkout))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product detail
        .route("/product/{id}", get(products::show))
        .merge(cart_routes())
        .route("/description", get(pages::description))
        .merge(auth_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_is_302_with_location() {
        let response = found("/cart");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/cart");
    }
}
