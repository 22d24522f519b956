//! The storefront walkthrough.
//!
//! Steps run in a fixed order against one browser session. Each step's
//! result is written to the status sheet row with the same index. The
//! first failure stops the run; later steps are reported as skipped and
//! their rows are left untouched.

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::browser::Browser;
use crate::config::E2eConfig;
use crate::error::{E2eError, E2eResult};
use crate::sheet::{self, Status};

/// Text the catalog page greets visitors with.
pub const WELCOME_TEXT: &str = "Welcome to our E-Commerce Store";

/// Scenario steps, in run order. The index is the status sheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    HomePage,
    AboutPage,
    InvalidLogin,
    ValidLogin,
    AddToCart,
    RemoveFromCart,
    Checkout,
    ReturnHome,
    Logout,
    LoggedOut,
}

impl Step {
    pub const ALL: [Self; 10] = [
        Self::HomePage,
        Self::AboutPage,
        Self::InvalidLogin,
        Self::ValidLogin,
        Self::AddToCart,
        Self::RemoveFromCart,
        Self::Checkout,
        Self::ReturnHome,
        Self::Logout,
        Self::LoggedOut,
    ];

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::HomePage => "Home page shows the welcome text",
            Self::AboutPage => "Description page shows About",
            Self::InvalidLogin => "Invalid login shows an error",
            Self::ValidLogin => "Valid login shows the logout link",
            Self::AddToCart => "Add configured products to the cart",
            Self::RemoveFromCart => "Remove the first product from the cart",
            Self::Checkout => "Checkout links back to home",
            Self::ReturnHome => "Home page shown after checkout",
            Self::Logout => "Click logout",
            Self::LoggedOut => "Login link shown after logout",
        }
    }
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Passed,
    Failed { reason: String },
    Skipped,
}

/// Report entry for one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    pub description: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
    pub duration_ms: u64,
}

/// Result of a full run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub base_url: String,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub steps: Vec<StepReport>,
}

impl ScenarioReport {
    /// Whether every step passed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }

    /// The step that stopped the run, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|s| matches!(s.outcome, StepOutcome::Failed { .. }))
    }
}

/// Runs the walkthrough against a storefront.
pub struct Scenario {
    config: E2eConfig,
    sheet: Option<PathBuf>,
}

impl Scenario {
    #[must_use]
    pub const fn new(config: E2eConfig) -> Self {
        Self {
            config,
            sheet: None,
        }
    }

    /// Record step results into this status sheet.
    #[must_use]
    pub fn with_sheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.sheet = Some(path.into());
        self
    }

    /// Run every step in order.
    ///
    /// Step failures are part of the report, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error only if the browser cannot be created.
    pub async fn run(&self) -> E2eResult<ScenarioReport> {
        let mut browser = Browser::new(self.config.wait)?;
        let started = Instant::now();
        let mut steps = Vec::with_capacity(Step::ALL.len());
        let mut stopped = false;

        for (index, step) in Step::ALL.into_iter().enumerate() {
            if stopped {
                steps.push(StepReport {
                    index,
                    step,
                    description: step.description().to_string(),
                    outcome: StepOutcome::Skipped,
                    duration_ms: 0,
                });
                continue;
            }

            info!(index, ?step, "Running step");
            let step_started = Instant::now();
            let result = self.run_step(&mut browser, step).await;
            let duration_ms = elapsed_ms(step_started);

            let outcome = match result {
                Ok(()) => {
                    info!(index, ?step, duration_ms, "Step passed");
                    self.record(index, Status::Pass);
                    StepOutcome::Passed
                }
                Err(e) => {
                    error!(index, ?step, error = %e, "Step failed");
                    self.record(index, Status::Fail);
                    stopped = true;
                    StepOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            steps.push(StepReport {
                index,
                step,
                description: step.description().to_string(),
                outcome,
                duration_ms,
            });

            if !stopped && !self.config.wait.step_delay().is_zero() {
                sleep(self.config.wait.step_delay()).await;
            }
        }

        let count = |f: fn(&StepOutcome) -> bool| steps.iter().filter(|s| f(&s.outcome)).count();
        let passed = count(|o| matches!(o, StepOutcome::Passed));
        let failed = count(|o| matches!(o, StepOutcome::Failed { .. }));
        let skipped = count(|o| matches!(o, StepOutcome::Skipped));

        if skipped > 0 {
            warn!(skipped, "Steps skipped after failure");
        }

        Ok(ScenarioReport {
            base_url: self.config.base_url.clone(),
            passed,
            failed,
            skipped,
            duration_ms: elapsed_ms(started),
            steps,
        })
    }

    fn record(&self, row: usize, status: Status) {
        if let Some(path) = &self.sheet {
            sheet::record(path, row, status);
        }
    }

    async fn run_step(&self, browser: &mut Browser, step: Step) -> E2eResult<()> {
        let config = &self.config;
        let home = config.url("/");

        match step {
            Step::HomePage => {
                browser.open(&home).await?;
                browser.assert_contains(WELCOME_TEXT, "Home page not displayed correctly")
            }
            Step::AboutPage => {
                browser.open(&config.url("/description")).await?;
                browser.assert_contains("About", "About page not displayed correctly")
            }
            Step::InvalidLogin => {
                browser.open(&config.url("/login")).await?;
                browser.wait_for_element("username").await?;
                browser
                    .submit_form(&[
                        ("username", config.login.invalid_username.as_str()),
                        ("password", config.login.invalid_password.as_str()),
                    ])
                    .await?;
                browser.assert_contains(
                    "Invalid credentials",
                    "Error message not displayed for invalid credentials",
                )
            }
            Step::ValidLogin => {
                browser.open(&config.url("/login")).await?;
                browser.wait_for_element("username").await?;
                browser
                    .submit_form(&[
                        ("username", config.login.username.as_str()),
                        ("password", config.login.password.as_str()),
                    ])
                    .await?;
                browser.wait_for_url_contains(&home).await?;
                browser.assert_contains(
                    &format!("Logout ({})", config.login.username),
                    "Logout link not displayed after login",
                )
            }
            Step::AddToCart => {
                for id in &config.product_ids {
                    let href = format!("/add_to_cart/{id}");
                    let link = browser
                        .wait_for_link(&format!("Add to Cart link for product {id}"), |link| {
                            link.text.contains("Add to Cart") && link.href.contains(&href)
                        })
                        .await?;
                    browser.open(link.url.as_str()).await?;
                }
                Ok(())
            }
            Step::RemoveFromCart => {
                let first = config
                    .product_ids
                    .first()
                    .ok_or_else(|| E2eError::Config("product_ids must not be empty".to_string()))?;
                let href = format!("/remove_from_cart/{first}");

                browser.open(&config.url("/cart")).await?;
                let link = browser
                    .wait_for_link(&format!("remove link for product {first}"), |link| {
                        link.href.contains(&href)
                    })
                    .await?;
                browser.open(link.url.as_str()).await
            }
            Step::Checkout => {
                browser.open(&config.url("/checkout")).await?;
                browser
                    .wait_for_link("Back to Home link", |link| {
                        link.text.contains("Back to Home")
                    })
                    .await?;
                browser
                    .click_link("Back to Home link", |link| link.text.contains("Back to Home"))
                    .await
            }
            Step::ReturnHome => {
                browser.wait_for_url_contains(&home).await?;
                browser.assert_contains(WELCOME_TEXT, "Home page not displayed after checkout")
            }
            Step::Logout => {
                let link = browser
                    .wait_for_link("Logout link", |link| link.text.contains("Logout"))
                    .await?;
                browser.open(link.url.as_str()).await
            }
            Step::LoggedOut => {
                browser.wait_for_url_contains(&home).await?;
                browser.assert_contains("Login", "Login link not displayed after logout")
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}
