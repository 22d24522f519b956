//! Authentication route handlers.
//!
//! Handles the login form, credential checks and logout. A session is
//! either anonymous or logged in as exactly one username.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{Span, instrument};

use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::routes::found;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub username: Option<String>,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login page.
#[instrument(skip(auth))]
pub async fn login_page(auth: OptionalAuth) -> impl IntoResponse {
    LoginTemplate {
        username: auth.username(),
    }
}

/// Handle login form submission.
///
/// On success the session is marked as logged in and the browser is sent
/// to the catalog. Wrong credentials answer 403 and leave the session as
/// it was.
///
/// # Errors
///
/// Returns `AppError::BadRequest` (400) if a form field is missing,
/// `AppError::Auth` (403) for invalid credentials, or a 500 if the session
/// cannot be written.
#[instrument(skip(state, session, form), fields(username = tracing::field::Empty))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Response> {
    let Form(form) = form.map_err(|e| {
        tracing::warn!(error = %e, "Rejected login form");
        AppError::BadRequest(e.body_text())
    })?;
    Span::current().record("username", form.username.as_str());

    let username = match state.credentials().verify(&form.username, &form.password) {
        Ok(username) => username,
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            return Err(AppError::Auth(e));
        }
    };

    set_current_user(&session, &CurrentUser::new(username.as_str())).await?;

    tracing::info!("Login succeeded");
    set_sentry_user(&username);
    add_breadcrumb("auth", "Logged in", Some(&[("username", username.as_str())]));

    Ok(found("/"))
}

/// Log out and return to the catalog.
///
/// Logging out an anonymous session is a no-op that still redirects.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response> {
    if let Some(user) = clear_current_user(&session).await? {
        tracing::info!(username = %user.username, "Logged out");
        add_breadcrumb("auth", "Logged out", None);
    }
    clear_sentry_user();

    Ok(found("/"))
}
