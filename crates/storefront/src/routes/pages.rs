//! Static content page route handlers.
//!
//! Serves markdown-based content pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "description.html")]
pub struct ContentPageTemplate {
    pub username: Option<String>,
    pub title: String,
    pub description: String,
    pub content_html: String,
}

/// Serve a content page by slug.
fn serve_content_page(
    state: &AppState,
    username: Option<String>,
    slug: &str,
) -> Result<ContentPageTemplate> {
    let page = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        username,
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        content_html: page.content_html.clone(),
    })
}

/// Display the description (About) page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, auth))]
pub async fn description(
    State(state): State<AppState>,
    auth: OptionalAuth,
) -> Result<impl IntoResponse> {
    serve_content_page(&state, auth.username(), "description")
}
