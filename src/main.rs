//! prwatch CLI entrypoint: watches one pull request until it is merged,
//! closed, or its checks finish.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prwatch::{MonitorError, PrwatchConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "prwatch=info";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<bool, MonitorError> {
    let config = load_config()?;
    cli::monitor::run(&config).await
}

/// Logs go to stderr so stdout carries only the JSON report. `RUST_LOG`
/// overrides the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`MonitorError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrwatchConfig, MonitorError> {
    PrwatchConfig::load().map_err(|error| MonitorError::Configuration {
        message: error.to_string(),
    })
}
