//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub username: Option<String>,
    pub products: Vec<ProductView>,
}

/// Display the catalog.
#[instrument(skip(state, auth))]
pub async fn home(State(state): State<AppState>, auth: OptionalAuth) -> impl IntoResponse {
    let products = state
        .catalog()
        .list()
        .iter()
        .map(ProductView::from)
        .collect();

    HomeTemplate {
        username: auth.username(),
        products,
    }
}
