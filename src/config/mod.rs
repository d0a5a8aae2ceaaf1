//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prwatch.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRWATCH_PR_URL`, `PRWATCH_TOKEN`, or the
//!    shared `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--pr-url`/`-u`, `--token`/`-t`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! pr_url = "https://github.com/owner/repo/pull/123"
//! token = "ghp_example"
//! poll_interval_seconds = 15
//! max_timeout_seconds = 7200
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::github::error::MonitorError;
use crate::github::gateway::{DEFAULT_API_BASE, GatewayOptions};
use crate::github::locator::PersonalAccessToken;
use crate::monitor::{DEFAULT_MAX_TIMEOUT_SECONDS, DEFAULT_POLL_INTERVAL_SECONDS, MonitorRequest};

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PRWATCH_PR_URL` or `--pr-url`: Pull request URL
/// - `PRWATCH_TOKEN`, `GITHUB_TOKEN`, or `--token`: Authentication token
/// - `PRWATCH_POLL_INTERVAL_SECONDS` or `--poll-interval-seconds`
/// - `PRWATCH_MAX_TIMEOUT_SECONDS` or `--max-timeout-seconds`
/// - `PRWATCH_API_URL` or `--api-url`: REST API base URL
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use prwatch::PrwatchConfig;
///
/// let config = PrwatchConfig::load().expect("failed to load configuration");
/// let request = config.monitor_request().expect("PR URL required");
/// let token = config.resolve_token();
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRWATCH",
    discovery(
        dotfile_name = ".prwatch.toml",
        config_file_name = "prwatch.toml",
        app_name = "prwatch"
    )
)]
pub struct PrwatchConfig {
    /// GitHub pull request URL to monitor.
    ///
    /// Can be provided via:
    /// - CLI: `--pr-url <URL>` or `-u <URL>`
    /// - Environment: `PRWATCH_PR_URL`
    /// - Config file: `pr_url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub pr_url: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Optional: without one, requests are unauthenticated and GitHub applies
    /// a much lower rate limit.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PRWATCH_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Seconds between polls. Values below 5 are raised to 5.
    ///
    /// Defaults to 30.
    #[ortho_config(cli_short = 'i')]
    pub poll_interval_seconds: f64,

    /// Overall monitoring budget in seconds. Values below 60 are raised to 60.
    ///
    /// Defaults to 3600 (one hour).
    #[ortho_config(cli_short = 'm')]
    pub max_timeout_seconds: f64,

    /// GitHub REST API base URL.
    ///
    /// Defaults to `https://api.github.com`.
    #[ortho_config()]
    pub api_url: String,

    /// Timeout for each HTTP request, in seconds.
    ///
    /// Defaults to 30.
    #[ortho_config()]
    pub request_timeout_seconds: u64,

    /// Emits progress events to stderr as JSON lines instead of log lines.
    ///
    /// Can be provided via:
    /// - CLI: `--jsonl-progress` / `-j`
    /// - Config file: `jsonl_progress = true`
    ///
    /// Note: `PRWATCH_JSONL_PROGRESS` is not supported because `ortho_config`
    /// does not load boolean values from the environment.
    #[ortho_config(cli_short = 'j')]
    pub jsonl_progress: bool,
}

impl Default for PrwatchConfig {
    fn default() -> Self {
        Self {
            pr_url: None,
            token: None,
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            max_timeout_seconds: DEFAULT_MAX_TIMEOUT_SECONDS,
            api_url: DEFAULT_API_BASE.to_owned(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            jsonl_progress: false,
        }
    }
}

impl PrwatchConfig {
    /// Resolves the token from configuration or the shared `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// Blank values are ignored. `None` means unauthenticated access.
    #[must_use]
    pub fn resolve_token(&self) -> Option<PersonalAccessToken> {
        self.token
            .as_deref()
            .and_then(PersonalAccessToken::new)
            .or_else(|| {
                env::var("GITHUB_TOKEN")
                    .ok()
                    .and_then(PersonalAccessToken::new)
            })
    }

    /// Returns the pull request URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::MissingPullRequestUrl`] when no URL is
    /// configured.
    pub fn require_pr_url(&self) -> Result<&str, MonitorError> {
        self.pr_url
            .as_deref()
            .ok_or(MonitorError::MissingPullRequestUrl)
    }

    /// Builds the monitoring request from the configured URL and timings.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::MissingPullRequestUrl`] when no URL is
    /// configured.
    pub fn monitor_request(&self) -> Result<MonitorRequest, MonitorError> {
        Ok(MonitorRequest::new(self.require_pr_url()?)
            .with_poll_interval(self.poll_interval_seconds)
            .with_max_timeout(self.max_timeout_seconds))
    }

    /// Gateway settings derived from the API URL, token, and request timeout.
    #[must_use]
    pub fn gateway_options(&self) -> GatewayOptions {
        GatewayOptions::new(self.resolve_token())
            .with_api_base(self.api_url.trim_end_matches('/'))
            .with_request_timeout(Duration::from_secs(self.request_timeout_seconds))
    }

    /// Checks values that cannot be validated field by field at load time.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Configuration`] when the API URL is not an
    /// absolute HTTP(S) URL or the request timeout is zero.
    pub fn validate(&self) -> Result<(), MonitorError> {
        let api_url = Url::parse(&self.api_url).map_err(|error| MonitorError::Configuration {
            message: format!("api_url is invalid: {error}"),
        })?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(MonitorError::Configuration {
                message: format!("api_url must use http or https, got {}", api_url.scheme()),
            });
        }
        if self.request_timeout_seconds == 0 {
            return Err(MonitorError::Configuration {
                message: "request_timeout_seconds must be greater than zero".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
