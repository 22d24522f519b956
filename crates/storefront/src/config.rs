//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `SHOP_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOP_PORT` - Listen port (default: 5000)
//! - `SHOP_BASE_URL` - Public URL (default: `http://{host}:{port}`)
//! - `SHOP_USERS` - Login accounts as `name:password` pairs, comma separated
//!   (default: `user:password`)
//! - `SHOP_CART_SCOPE` - `shared` (one cart for everyone) or `session`
//!   (default: shared)
//! - `SHOP_CONTENT_DIR` - Directory with `pages/*.md` overriding built-in pages
//! - `SHOP_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::{BTreeMap, HashMap};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_USERS: &str = "user:password";
const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";

/// Substrings that mark a copied-in sample value rather than a real secret.
const PLACEHOLDER_WORDS: &[&str] = &[
    "changeme",
    "change-me",
    "placeholder",
    "example",
    "secret",
    "password",
    "your-",
    "your_",
    "replace",
    "xxxx",
    "todo",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where cart contents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartScope {
    /// One process-wide cart shared by every client.
    #[default]
    Shared,
    /// One cart per browser session.
    Session,
}

impl FromStr for CartScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" | "global" => Ok(Self::Shared),
            "session" => Ok(Self::Session),
            other => Err(format!("expected 'shared' or 'session', got '{other}'")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Login accounts
    pub users: UserTable,
    /// Where carts are kept
    pub cart_scope: CartScope,
    /// Optional content directory overriding built-in pages
    pub content_dir: Option<PathBuf>,
    /// Static asset directory served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Username to plaintext password table.
///
/// Implements `Debug` manually to redact passwords.
#[derive(Clone, Default)]
pub struct UserTable(HashMap<String, SecretString>);

impl UserTable {
    /// Parse `name:password` pairs separated by commas.
    ///
    /// The password is everything after the first `:`, so it may itself
    /// contain colons but not commas.
    ///
    /// # Errors
    ///
    /// Returns a description of the first malformed entry.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut users = HashMap::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, password) = entry
                .split_once(':')
                .ok_or_else(|| format!("entry '{entry}' is not in name:password form"))?;
            if name.is_empty() {
                return Err("username cannot be empty".to_string());
            }
            users.insert(name.to_string(), SecretString::from(password.to_string()));
        }
        if users.is_empty() {
            return Err("at least one user is required".to_string());
        }
        Ok(Self(users))
    }

    /// Get the password for a username.
    #[must_use]
    pub fn password(&self, username: &str) -> Option<&SecretString> {
        self.0.get(username)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for UserTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.0.keys().collect();
        names.sort();
        f.debug_map()
            .entries(names.into_iter().map(|name| (name, "[REDACTED]")))
            .finish()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for UserTable {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(name, password)| {
                    (name.to_string(), SecretString::from(password.to_string()))
                })
                .collect(),
        )
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let host = vars
            .or_default("SHOP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_HOST".to_string(), e.to_string()))?;
        let port = vars
            .or_default("SHOP_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_PORT".to_string(), e.to_string()))?;

        let base_url = vars
            .optional("SHOP_BASE_URL")
            .unwrap_or_else(|| format!("http://{}", SocketAddr::new(host, port)));
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_BASE_URL".to_string(), e.to_string()))?;

        let session_secret = vars.secret("SHOP_SESSION_SECRET")?;

        let users = UserTable::parse(&vars.or_default("SHOP_USERS", DEFAULT_USERS))
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_USERS".to_string(), e))?;
        let cart_scope = vars
            .or_default("SHOP_CART_SCOPE", "shared")
            .parse::<CartScope>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOP_CART_SCOPE".to_string(), e))?;

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            users,
            cart_scope,
            content_dir: vars.optional("SHOP_CONTENT_DIR").map(PathBuf::from),
            static_dir: PathBuf::from(vars.or_default("SHOP_STATIC_DIR", DEFAULT_STATIC_DIR)),
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Variable lookup wrapper.
struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    /// Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// A required secret that must pass [`weak_secret_reason`].
    fn secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        if let Some(reason) = weak_secret_reason(&value) {
            return Err(ConfigError::InsecureSecret(key.to_string(), reason));
        }
        Ok(SecretString::from(value))
    }
}

/// Why a session secret is unacceptable, or `None` if it is fine.
///
/// Checks length, placeholder words, then per-character Shannon entropy.
fn weak_secret_reason(secret: &str) -> Option<String> {
    let chars = secret.chars().count();
    if chars < MIN_SESSION_SECRET_LENGTH {
        return Some(format!(
            "must be at least {MIN_SESSION_SECRET_LENGTH} characters, got {chars}"
        ));
    }

    let lower = secret.to_lowercase();
    if let Some(word) = PLACEHOLDER_WORDS.iter().find(|word| lower.contains(*word)) {
        return Some(format!("looks like a placeholder (contains {word:?})"));
    }

    let bits = bits_per_char(secret);
    if bits < MIN_BITS_PER_CHAR {
        return Some(format!(
            "too predictable ({bits:.2} bits per character, need {MIN_BITS_PER_CHAR}); generate it randomly"
        ));
    }

    None
}

/// Shannon entropy of the character distribution, in bits per character.
fn bits_per_char(s: &str) -> f64 {
    let mut counts: BTreeMap<char, u32> = BTreeMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }

    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total = f64::from(total);

    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}
