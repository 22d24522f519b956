//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
    response::IntoResponse,
};
use minishop_core::{Product, ProductId};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.to_string(),
        }
    }
}

/// Product ID taken from the `{id}` path segment.
///
/// Only plain decimal digits are accepted. Anything else (a sign, letters)
/// does not name a product route and is rejected with 404. Digit strings
/// too large for an ID parse to one that matches no product.
#[derive(Debug, Clone, Copy)]
pub struct ProductPath(pub ProductId);

impl<S> FromRequestParts<S> for ProductPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(e.to_string()))?;

        raw.parse::<ProductId>()
            .map(Self)
            .map_err(|e| AppError::NotFound(e.to_string()))
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub username: Option<String>,
    pub product: ProductView,
}

/// Display product detail page.
///
/// # Errors
///
/// Returns `AppError::ProductNotFound` (404) for IDs not in the catalog.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    auth: OptionalAuth,
    ProductPath(id): ProductPath,
) -> Result<impl IntoResponse> {
    let product = state.catalog().find(id)?;

    Ok(ProductTemplate {
        username: auth.username(),
        product: ProductView::from(product),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_view_formats_price() {
        let catalog = minishop_core::Catalog::demo();
        let view = ProductView::from(catalog.list().first().unwrap());
        assert_eq!(view.id, 1);
        assert_eq!(view.name, "Product 1");
        assert_eq!(view.price, "$100.00");
    }
}
