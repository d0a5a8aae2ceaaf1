//! Gateway for reading pull request data from the GitHub REST API.
//!
//! The trait-based design lets tests substitute mocks while the Octocrab
//! implementation performs real HTTP requests. Gateway methods return raw
//! JSON: payload validation happens when the status snapshot is assembled.

mod client;
mod error_mapping;
mod http_utils;
mod pull_request;

pub use client::{DEFAULT_API_BASE, GatewayOptions};
pub use pull_request::OctocrabGateway;

use async_trait::async_trait;
use serde_json::Value;

use crate::github::error::MonitorError;
use crate::github::locator::PullRequestLocator;

/// Gateway that can load the raw pieces of a pull request status.
///
/// Every method may fail with [`MonitorError::Network`] on transport
/// failures, [`MonitorError::NotFound`] on 404,
/// [`MonitorError::RateLimitExceeded`] when the quota is exhausted, and
/// [`MonitorError::Api`] for any other error status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Whether requests carry a bearer token.
    fn is_authenticated(&self) -> bool;

    /// Fetch the pull request object.
    async fn pull_request(&self, locator: &PullRequestLocator) -> Result<Value, MonitorError>;

    /// Fetch every review, concatenated across pages in page order.
    async fn reviews(&self, locator: &PullRequestLocator) -> Result<Vec<Value>, MonitorError>;

    /// Fetch the combined commit status for `sha`.
    async fn commit_status(
        &self,
        locator: &PullRequestLocator,
        sha: &str,
    ) -> Result<Value, MonitorError>;

    /// Fetch every check run for `sha`, concatenated across pages.
    async fn check_runs(
        &self,
        locator: &PullRequestLocator,
        sha: &str,
    ) -> Result<Vec<Value>, MonitorError>;
}
