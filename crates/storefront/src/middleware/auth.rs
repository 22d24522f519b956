//! Authentication extractors and session helpers.
//!
//! The session is either anonymous (no [`CurrentUser`] stored) or
//! authenticated as exactly one username.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// Extractor that optionally gets the logged-in user.
///
/// Never rejects; anonymous sessions (or requests without a session layer)
/// yield `None`.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
///     match user {
///         Some(u) => format!("Hello, {}!", u.username),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalAuth(pub Option<CurrentUser>);

impl OptionalAuth {
    /// The username, if authenticated.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|user| user.username.clone())
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };

        // A session that cannot be read is treated as anonymous.
        let user = match session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read current user from session");
                None
            }
        };

        Ok(Self(user))
    }
}

/// Mark the session as authenticated.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Return the session to anonymous (logout).
///
/// Returns the user that was logged in, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(
    session: &Session,
) -> Result<Option<CurrentUser>, tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use tower_sessions::MemoryStore;

    use super::*;

    async fn extract(session: Option<Session>) -> OptionalAuth {
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();
        if let Some(session) = session {
            parts.extensions.insert(session);
        }
        let Ok(auth) = OptionalAuth::from_request_parts(&mut parts, &()).await;
        auth
    }

    fn new_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_logged_in_session_yields_user() {
        let session = new_session();
        set_current_user(&session, &CurrentUser::new("user")).await.unwrap();

        assert_eq!(extract(Some(session)).await.username().as_deref(), Some("user"));
    }

    #[tokio::test]
    async fn test_missing_session_layer_is_anonymous() {
        assert!(extract(None).await.0.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_user_is_anonymous() {
        let session = new_session();
        session.insert(session_keys::CURRENT_USER, 42).await.unwrap();

        assert!(extract(Some(session)).await.0.is_none());
    }
}
