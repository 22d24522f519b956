//! Session middleware configuration.
//!
//! Sessions live in an in-memory store; the browser only holds the session
//! ID, in a cookie signed with a key derived from `SHOP_SESSION_SECRET`.

use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "minishop_session";

/// Create the session layer with an in-memory store.
///
/// The cookie expires when the browser session ends; the application sets
/// no expiry of its own.
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnSessionEnd)
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config.session_secret.expose_secret()))
}

/// Derive the 64-byte cookie signing key from the configured secret.
fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_key_is_deterministic() {
        let a = signing_key("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6");
        let b = signing_key("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6");
        let c = signing_key("zZ9$yY8!xK7@wL6#vQ5&uT4*tW3^sC2");
        assert_eq!(a.master(), b.master());
        assert_ne!(a.master(), c.master());
    }
}
