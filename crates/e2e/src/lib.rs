//! Minishop E2E - scripted walkthrough of a running storefront.
//!
//! A [`Scenario`] drives a [`Browser`] through the storefront the way a
//! shopper would: home page, about page, a rejected and an accepted
//! login, adding and removing cart items, checkout and logout. Each step's
//! Pass/Fail lands in a row of the status sheet (see [`sheet`]).
//!
//! # Modules
//!
//! - [`config`] - JSON configuration: base URL, credentials, product IDs, waits
//! - [`browser`] - Cookie-keeping HTTP client that reads links and forms from HTML
//! - [`scenario`] - The ordered steps and the run report
//! - [`sheet`] - CSV status sheet with a `Status` column
//! - [`error`] - Error type shared by all of the above

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod browser;
pub mod config;
pub mod error;
pub mod scenario;
pub mod sheet;

pub use browser::{Browser, Link};
pub use config::E2eConfig;
pub use error::{E2eError, E2eResult};
pub use scenario::{Scenario, ScenarioReport, Step, StepOutcome};
pub use sheet::{Status, StatusSheet};
