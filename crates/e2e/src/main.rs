//! Minishop E2E runner.
//!
//! # Usage
//!
//! ```bash
//! # Run against the storefront named in config.json, recording into testcase.csv
//! minishop-e2e
//!
//! # Custom files, plus a JSON report
//! minishop-e2e --config staging.json --sheet results.csv --report report.json
//! ```
//!
//! Exits non-zero if any step fails.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use minishop_e2e::{E2eConfig, Scenario, ScenarioReport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minishop-e2e")]
#[command(author, version, about = "End-to-end walkthrough of a Minishop storefront")]
struct Cli {
    /// Scenario configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Status sheet to record Pass/Fail into
    #[arg(short, long, default_value = "testcase.csv")]
    sheet: PathBuf,

    /// Write a JSON report here
    #[arg(short, long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "minishop_e2e=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(report) if report.success() => {
            tracing::info!(passed = report.passed, "All steps passed");
            ExitCode::SUCCESS
        }
        Ok(report) => {
            if let Some(step) = report.first_failure() {
                tracing::error!(
                    index = step.index,
                    step = ?step.step,
                    passed = report.passed,
                    skipped = report.skipped,
                    "Scenario failed"
                );
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!("Run failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ScenarioReport, Box<dyn std::error::Error>> {
    let config = E2eConfig::load(&cli.config)?;
    tracing::info!(base_url = %config.base_url, sheet = %cli.sheet.display(), "Starting scenario");

    let report = Scenario::new(config).with_sheet(&cli.sheet).run().await?;

    if let Some(path) = &cli.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(report)
}
