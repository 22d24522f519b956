//! Integration test harness for Minishop.
//!
//! [`TestServer`] runs the real storefront router on an ephemeral port
//! inside the test's tokio runtime, so tests talk to it over HTTP exactly
//! as a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p minishop-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_storefront_health() {
//!     let server = TestServer::spawn().await;
//!     let resp = TestServer::client()
//!         .get(server.url("/health"))
//!         .send()
//!         .await
//!         .unwrap();
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use minishop_storefront::config::{CartScope, UserTable};
use minishop_storefront::{AppState, StorefrontConfig};
use reqwest::Client;
use reqwest::redirect::Policy;
use secrecy::SecretString;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Session secret used by every test server.
pub const TEST_SESSION_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6-Hv8%Jd1=";

/// Username accepted by [`test_config`].
pub const TEST_USERNAME: &str = "user";

/// Password accepted by [`test_config`].
pub const TEST_PASSWORD: &str = "password";

/// Storefront configuration for tests: shared cart, one user, built-in
/// content, no Sentry.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        session_secret: SecretString::from(TEST_SESSION_SECRET),
        users: UserTable::from([(TEST_USERNAME, TEST_PASSWORD)]),
        cart_scope: CartScope::Shared,
        content_dir: None,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static")),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A storefront served on `127.0.0.1` with an OS-assigned port.
///
/// The server task is aborted when the handle is dropped.
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server with [`test_config`].
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// Spawn a server with a custom configuration.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be built or the listener cannot bind.
    pub async fn spawn_with(config: StorefrontConfig) -> Self {
        let state = AppState::new(config).expect("Failed to build application state");
        Self::spawn_state(state).await
    }

    /// Spawn a server around prebuilt application state.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    pub async fn spawn_state(state: AppState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let app = minishop_storefront::app(state);

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, handle }
    }

    /// Base URL, e.g. `http://127.0.0.1:54321`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    /// HTTP client with a cookie jar that does not follow redirects.
    ///
    /// Each client is a separate browser session.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
