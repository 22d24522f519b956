//! Scenario configuration, loaded from a JSON file.
//!
//! ```json
//! {
//!   "base_url": "http://localhost:5000",
//!   "login": {
//!     "username": "user",
//!     "password": "password",
//!     "invalid_username": "nobody",
//!     "invalid_password": "wrong"
//!   },
//!   "product_ids": [1, 2, 3],
//!   "wait": { "timeout_secs": 10, "poll_interval_ms": 250, "step_delay_ms": 0 }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{E2eError, E2eResult};

/// Top-level scenario configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct E2eConfig {
    /// Storefront root, without a trailing slash.
    pub base_url: String,

    pub login: LoginConfig,

    /// Products added to the cart, in order. The first one is removed again.
    #[serde(default = "default_product_ids")]
    pub product_ids: Vec<i32>,

    #[serde(default)]
    pub wait: WaitConfig,
}

/// Credentials for the valid and invalid login steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginConfig {
    pub username: String,
    pub password: String,
    pub invalid_username: String,
    pub invalid_password: String,
}

/// Polling and pacing for the browser.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// How long a wait polls before failing.
    pub timeout_secs: u64,
    /// Delay between polls.
    pub poll_interval_ms: u64,
    /// Pause after every step.
    pub step_delay_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            poll_interval_ms: 250,
            step_delay_ms: 0,
        }
    }
}

impl WaitConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

fn default_product_ids() -> Vec<i32> {
    vec![1, 2, 3]
}

impl E2eConfig {
    /// Load and validate a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn load(path: &Path) -> E2eResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            E2eError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a config document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(raw: &str) -> E2eResult<Self> {
        let mut config: Self = serde_json::from_str(raw)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> E2eResult<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(E2eError::Config(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.product_ids.is_empty() {
            return Err(E2eError::Config("product_ids must not be empty".to_string()));
        }
        if self.wait.poll_interval_ms == 0 {
            return Err(E2eError::Config("wait.poll_interval_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "base_url": "http://localhost:5000/",
        "login": {
            "username": "user",
            "password": "password",
            "invalid_username": "nobody",
            "invalid_password": "wrong"
        }
    }"#;

    #[test]
    fn test_defaults() {
        let config = E2eConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.product_ids, vec![1, 2, 3]);
        assert_eq!(config.wait.timeout(), Duration::from_secs(10));
        assert_eq!(config.wait.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.wait.step_delay(), Duration::ZERO);
        assert_eq!(config.url("/cart"), "http://localhost:5000/cart");
    }

    #[test]
    fn test_overrides() {
        let raw = r#"{
            "base_url": "https://shop.example.com",
            "login": {"username": "a", "password": "b", "invalid_username": "c", "invalid_password": "d"},
            "product_ids": [3],
            "wait": {"timeout_secs": 2}
        }"#;
        let config = E2eConfig::from_json(raw).unwrap();
        assert_eq!(config.product_ids, vec![3]);
        assert_eq!(config.wait.timeout_secs, 2);
        assert_eq!(config.wait.poll_interval_ms, 250);
    }

    #[test]
    fn test_missing_login_is_rejected() {
        let result = E2eConfig::from_json(r#"{"base_url": "http://localhost:5000"}"#);
        assert!(matches!(result, Err(E2eError::Json(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let raw = MINIMAL.replace("http://localhost:5000/", "not a url");
        assert!(matches!(E2eConfig::from_json(&raw), Err(E2eError::Url(_))));

        let raw = MINIMAL.replace("http://localhost:5000/", "ftp://localhost");
        assert!(matches!(E2eConfig::from_json(&raw), Err(E2eError::Config(_))));
    }

    #[test]
    fn test_empty_product_ids() {
        let raw = MINIMAL.replace("\"login\"", "\"product_ids\": [], \"login\"");
        assert!(matches!(E2eConfig::from_json(&raw), Err(E2eError::Config(_))));
    }
}
