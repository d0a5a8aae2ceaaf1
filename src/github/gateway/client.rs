//! Octocrab client construction for the gateway.

use std::time::Duration;

use http::Uri;
use http::header::ACCEPT;
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;

use crate::github::error::MonitorError;
use crate::github::locator::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

/// Public GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Connection settings for one monitoring session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOptions {
    /// API base URL, `https://api.github.com` unless overridden.
    pub api_base: String,
    /// Bearer token; `None` means unauthenticated requests.
    pub token: Option<PersonalAccessToken>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl GatewayOptions {
    /// Options for the public API with the given token.
    #[must_use]
    pub fn new(token: Option<PersonalAccessToken>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            token,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Replaces the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Replaces the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Builds an Octocrab client with the GitHub JSON media type and, when a
/// token is present, bearer authentication.
///
/// Octocrab already pins `X-GitHub-Api-Version` on every request.
///
/// Octocrab's own retries are disabled: the monitor decides when to retry.
///
/// Must be called inside a Tokio runtime.
///
/// # Errors
///
/// Returns `MonitorError::InvalidUrl` when the base URI cannot be parsed or
/// `MonitorError::Client` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(options: &GatewayOptions) -> Result<Octocrab, MonitorError> {
    let base_uri: Uri = options
        .api_base
        .parse::<Uri>()
        .map_err(|error| MonitorError::InvalidUrl(error.to_string()))?;

    let mut builder = Octocrab::builder()
        .base_uri(base_uri)
        .map_err(|error| MonitorError::Client {
            message: format!("build client failed: {error}"),
        })?
        .add_retry_config(RetryConfig::None)
        .add_header(ACCEPT, GITHUB_JSON.to_owned())
        .set_connect_timeout(Some(options.request_timeout))
        .set_read_timeout(Some(options.request_timeout));

    if let Some(token) = options.token.as_ref() {
        builder = builder.personal_token(token.value());
    }

    builder
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
