//! Pull request monitoring sessions.
//!
//! [`monitor`] parses the pull request URL, validates the polling
//! parameters, connects a gateway, and runs a [`MonitorSession`] until the
//! pull request is merged, closed, or its checks complete, or until the
//! timeout budget runs out. Invalid input is rejected before any request is
//! made.

mod clock;
mod outcome;
mod session;
mod settings;
mod state;

#[cfg(any(test, feature = "test-support"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use outcome::{MonitorOutcome, MonitorReport, TerminationReason};
pub use session::MonitorSession;
pub use settings::{
    DEFAULT_MAX_TIMEOUT_SECONDS, DEFAULT_POLL_INTERVAL_SECONDS, MAX_TIMEOUT_RANGE,
    MonitoringConfig, POLL_INTERVAL_RANGE,
};
pub use state::{
    FailureAction, MAX_RATE_LIMIT_WAIT, RateLimitDecision, SessionState, WaitCause,
    rate_limit_backoff, termination_reason,
};

use tracing::warn;

use crate::github::error::MonitorError;
use crate::github::gateway::{GatewayOptions, OctocrabGateway};
use crate::github::locator::PullRequestLocator;
use crate::progress::ProgressSink;

/// A request to monitor one pull request.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorRequest {
    /// Pull request URL, e.g. `https://github.com/owner/repo/pull/123`.
    pub pr_url: String,
    /// Requested seconds between polls; raised to 5 if lower.
    pub poll_interval_seconds: f64,
    /// Requested overall timeout in seconds; raised to 60 if lower.
    pub max_timeout_seconds: f64,
}

impl MonitorRequest {
    /// Creates a request with the default interval (30s) and timeout (1h).
    #[must_use]
    pub fn new(pr_url: impl Into<String>) -> Self {
        Self {
            pr_url: pr_url.into(),
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            max_timeout_seconds: DEFAULT_MAX_TIMEOUT_SECONDS,
        }
    }

    /// Replaces the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, seconds: f64) -> Self {
        self.poll_interval_seconds = seconds;
        self
    }

    /// Replaces the overall timeout.
    #[must_use]
    pub const fn with_max_timeout(mut self, seconds: f64) -> Self {
        self.max_timeout_seconds = seconds;
        self
    }

    /// Parses the URL and validates the floored polling parameters.
    ///
    /// # Errors
    ///
    /// Returns the URL parse error, or `MonitorError::Configuration` when a
    /// parameter is above its maximum or not a number.
    pub fn validate(&self) -> Result<(PullRequestLocator, MonitoringConfig), MonitorError> {
        let locator = PullRequestLocator::parse(&self.pr_url)?;
        let config =
            MonitoringConfig::with_floors(self.poll_interval_seconds, self.max_timeout_seconds)?;
        Ok((locator, config))
    }
}

/// Monitors a pull request with the system clock.
///
/// Never fails: invalid requests become [`MonitorReport::Rejected`] and
/// every session ends in a [`MonitorOutcome`].
pub async fn monitor(
    request: &MonitorRequest,
    options: &GatewayOptions,
    progress: &dyn ProgressSink,
) -> MonitorReport {
    monitor_with_clock(request, options, progress, &SystemClock::new()).await
}

/// Monitors a pull request, reading time through `clock`.
pub async fn monitor_with_clock(
    request: &MonitorRequest,
    options: &GatewayOptions,
    progress: &dyn ProgressSink,
    clock: &dyn Clock,
) -> MonitorReport {
    let (locator, config) = match request.validate() {
        Ok(validated) => validated,
        Err(error) => {
            warn!(
                %error,
                invalid_reference = error.is_invalid_reference(),
                "monitor request rejected"
            );
            return MonitorReport::rejected(&error);
        }
    };

    let gateway = match OctocrabGateway::connect(options) {
        Ok(gateway) => gateway,
        Err(error) => {
            warn!(%error, "could not create GitHub client");
            return MonitorReport::rejected(&error);
        }
    };

    MonitorSession::new(&locator, config, &gateway, clock, progress)
        .run()
        .await
        .into()
}
