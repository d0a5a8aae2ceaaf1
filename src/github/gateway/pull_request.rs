//! Octocrab-backed gateway implementation.

use async_trait::async_trait;
use http::Uri;
use octocrab::Octocrab;
use serde_json::Value;
use tracing::debug;

use crate::github::error::MonitorError;
use crate::github::locator::PullRequestLocator;
use crate::github::pagination::{collect_pages, paged_path};
use crate::github::rate_limit::RateLimitInfo;

use super::PullRequestGateway;
use super::client::{GatewayOptions, build_octocrab_client};
use super::error_mapping::{map_http_error, map_octocrab_error};

/// Gateway that reads pull request data through Octocrab.
///
/// Requests go through Octocrab's raw request API so that status codes and
/// rate limit headers are visible before the body is interpreted.
pub struct OctocrabGateway {
    client: Octocrab,
    authenticated: bool,
}

impl OctocrabGateway {
    /// Creates a gateway for the configured API base and token.
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::InvalidUrl` when the API base cannot be parsed
    /// or `MonitorError::Client` when Octocrab rejects the configuration.
    pub fn connect(options: &GatewayOptions) -> Result<Self, MonitorError> {
        let client = build_octocrab_client(options)?;
        Ok(Self {
            client,
            authenticated: options.token.is_some(),
        })
    }

    /// Issues a GET request and decodes the body as JSON.
    async fn get_json(&self, path: &str) -> Result<Value, MonitorError> {
        let uri: Uri = path
            .parse::<Uri>()
            .map_err(|error| MonitorError::InvalidUrl(error.to_string()))?;

        debug!(path, "requesting GitHub resource");
        let response = self
            .client
            ._get(uri)
            .await
            .map_err(|error| map_octocrab_error(path, &error))?;

        let status = response.status();
        let rate_limit = RateLimitInfo::from_headers(response.headers());

        if status.is_success() {
            let body = self
                .client
                .body_to_string(response)
                .await
                .map_err(|error| map_octocrab_error(path, &error))?;
            return serde_json::from_str(&body).map_err(|error| MonitorError::MalformedResponse {
                message: format!("{path} returned invalid JSON: {error}"),
            });
        }

        let body = self
            .client
            .body_to_string(response)
            .await
            .unwrap_or_else(|_| String::new());
        debug!(path, status = status.as_u16(), "GitHub request failed");
        Err(map_http_error(path, status, rate_limit, &body))
    }

    /// Fetches one page of a list endpoint. `extract` pulls the array out of
    /// the page body.
    async fn get_page(
        &self,
        path: &str,
        page: u32,
        extract: fn(Value) -> Option<Vec<Value>>,
    ) -> Result<Vec<Value>, MonitorError> {
        let paged = paged_path(path, page);
        let body = self.get_json(&paged).await?;
        extract(body).ok_or_else(|| MonitorError::MalformedResponse {
            message: format!("{paged} did not return a list"),
        })
    }
}

fn array_body(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Check-run pages wrap the list in an object; a missing field counts as an
/// empty page.
fn check_runs_body(body: Value) -> Option<Vec<Value>> {
    let Value::Object(mut fields) = body else {
        return None;
    };
    match fields.remove("check_runs") {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(Value::Array(items)) => Some(items),
        Some(_) => None,
    }
}

#[async_trait]
impl PullRequestGateway for OctocrabGateway {
    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    async fn pull_request(&self, locator: &PullRequestLocator) -> Result<Value, MonitorError> {
        self.get_json(&locator.pull_request_path()).await
    }

    async fn reviews(&self, locator: &PullRequestLocator) -> Result<Vec<Value>, MonitorError> {
        let owned_path = locator.reviews_path();
        let path = owned_path.as_str();
        collect_pages(move |page| self.get_page(path, page, array_body)).await
    }

    async fn commit_status(
        &self,
        locator: &PullRequestLocator,
        sha: &str,
    ) -> Result<Value, MonitorError> {
        self.get_json(&locator.commit_status_path(sha)).await
    }

    async fn check_runs(
        &self,
        locator: &PullRequestLocator,
        sha: &str,
    ) -> Result<Vec<Value>, MonitorError> {
        let owned_path = locator.check_runs_path(sha);
        let path = owned_path.as_str();
        collect_pages(move |page| self.get_page(path, page, check_runs_body)).await
    }
}
