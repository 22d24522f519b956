//! Authentication service.
//!
//! Login checks go through the [`CredentialVerifier`] trait so the built-in
//! username/password table can be swapped for a real secret store without
//! touching the route handlers.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};

use crate::config::UserTable;

/// Checks a username/password pair.
pub trait CredentialVerifier: Send + Sync {
    /// Verify credentials, returning the canonical username on success.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the pair does not match.
    fn verify(&self, username: &str, password: &SecretString) -> Result<String, AuthError>;
}

/// Verifier backed by a fixed username to plaintext password table.
///
/// Comparison is exact and case-sensitive on both fields.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    users: UserTable,
}

impl StaticCredentials {
    #[must_use]
    pub const fn new(users: UserTable) -> Self {
        Self { users }
    }
}

impl From<UserTable> for StaticCredentials {
    fn from(users: UserTable) -> Self {
        Self::new(users)
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &SecretString) -> Result<String, AuthError> {
        let expected = self
            .users
            .password(username)
            .ok_or(AuthError::InvalidCredentials)?;

        if expected.expose_secret() == password.expose_secret() {
            Ok(username.to_string())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn verifier() -> StaticCredentials {
        StaticCredentials::new(UserTable::from([("user", "password"), ("Admin", "Pa:ss")]))
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_valid_credentials() {
        assert_eq!(verifier().verify("user", &secret("password")).unwrap(), "user");
        assert_eq!(verifier().verify("Admin", &secret("Pa:ss")).unwrap(), "Admin");
    }

    #[test]
    fn test_wrong_password() {
        assert!(matches!(
            verifier().verify("user", &secret("wrong")),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_user() {
        assert!(matches!(
            verifier().verify("nobody", &secret("password")),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(verifier().verify("User", &secret("password")).is_err());
        assert!(verifier().verify("user", &secret("Password")).is_err());
        assert!(verifier().verify("admin", &secret("Pa:ss")).is_err());
    }

    #[test]
    fn test_empty_password_never_matches_nonempty() {
        assert!(verifier().verify("user", &secret("")).is_err());
    }
}
