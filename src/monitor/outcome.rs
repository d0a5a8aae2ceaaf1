//! Result records returned by a monitoring session.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::github::error::MonitorError;
use crate::github::models::PullRequestStatus;

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The pull request was merged.
    Merged,
    /// The pull request was closed without merging.
    Closed,
    /// Every check run completed.
    ChecksComplete,
    /// The timeout budget ran out.
    Timeout,
    /// The rate limit resets after the timeout budget would run out.
    RateLimitTimeout,
    /// GitHub returned an error that retrying will not fix.
    ApiError,
}

impl TerminationReason {
    /// The snake case name used in result records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merged => "merged",
            Self::Closed => "closed",
            Self::ChecksComplete => "checks_complete",
            Self::Timeout => "timeout",
            Self::RateLimitTimeout => "rate_limit_timeout",
            Self::ApiError => "api_error",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Uniform record describing how a session ended.
///
/// Reason-specific fields are omitted from JSON when absent; `final_status`
/// is always present and is `null` when no poll succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorOutcome {
    /// Whether the pull request reached a terminal state.
    pub success: bool,
    /// Why monitoring stopped.
    pub reason: TerminationReason,
    /// Seconds since the session started.
    pub elapsed_seconds: f64,
    /// Number of fetch attempts made.
    pub poll_count: u64,
    /// Last snapshot obtained, if any.
    pub final_status: Option<PullRequestStatus>,
    /// Whether every check passed; set for `checks_complete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks_passed: Option<bool>,
    /// HTTP status of the failing response; set for `api_error` when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Error description; set for `api_error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Extra explanation; set for `rate_limit_timeout`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MonitorOutcome {
    const fn base(
        success: bool,
        reason: TerminationReason,
        elapsed: Duration,
        poll_count: u64,
        final_status: Option<PullRequestStatus>,
    ) -> Self {
        Self {
            success,
            reason,
            elapsed_seconds: elapsed.as_secs_f64(),
            poll_count,
            final_status,
            checks_passed: None,
            status_code: None,
            error: None,
            message: None,
        }
    }

    /// The pull request reached a terminal state. Success is true for merged
    /// and closed, and mirrors `checks_passing` for completed checks.
    #[must_use]
    pub fn terminal(
        reason: TerminationReason,
        elapsed: Duration,
        poll_count: u64,
        status: PullRequestStatus,
    ) -> Self {
        let checks_passed =
            (reason == TerminationReason::ChecksComplete).then_some(status.checks_passing);
        Self {
            checks_passed,
            ..Self::base(
                checks_passed.unwrap_or(true),
                reason,
                elapsed,
                poll_count,
                Some(status),
            )
        }
    }

    /// The timeout budget ran out.
    #[must_use]
    pub fn timeout(
        elapsed: Duration,
        poll_count: u64,
        last_status: Option<PullRequestStatus>,
    ) -> Self {
        Self::base(
            false,
            TerminationReason::Timeout,
            elapsed,
            poll_count,
            last_status,
        )
    }

    /// The rate limit resets too late to keep waiting.
    #[must_use]
    pub fn rate_limit_timeout(
        elapsed: Duration,
        poll_count: u64,
        last_status: Option<PullRequestStatus>,
    ) -> Self {
        Self {
            message: Some("Rate limit reset exceeds remaining timeout".to_owned()),
            ..Self::base(
                false,
                TerminationReason::RateLimitTimeout,
                elapsed,
                poll_count,
                last_status,
            )
        }
    }

    /// A non-retryable error ended the session.
    #[must_use]
    pub fn api_error(
        error: &MonitorError,
        elapsed: Duration,
        poll_count: u64,
        last_status: Option<PullRequestStatus>,
    ) -> Self {
        Self {
            status_code: error.status_code(),
            error: Some(error.to_string()),
            ..Self::base(
                false,
                TerminationReason::ApiError,
                elapsed,
                poll_count,
                last_status,
            )
        }
    }
}

/// What a monitoring request produced.
///
/// Requests rejected before any network activity carry only `success` and
/// `error`; every other path yields the full [`MonitorOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MonitorReport {
    /// The session ran and ended with an outcome.
    Finished(Box<MonitorOutcome>),
    /// The request was invalid.
    Rejected {
        /// Always false.
        success: bool,
        /// Why the request was rejected.
        error: String,
    },
}

impl MonitorReport {
    /// Builds a rejection from a validation error.
    #[must_use]
    pub fn rejected(error: &MonitorError) -> Self {
        Self::Rejected {
            success: false,
            error: error.to_string(),
        }
    }

    /// Whether the request succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Finished(outcome) => outcome.as_ref().success,
            Self::Rejected { success, .. } => *success,
        }
    }

    /// The session outcome, when the session ran.
    #[must_use]
    pub fn outcome(&self) -> Option<&MonitorOutcome> {
        match self {
            Self::Finished(outcome) => Some(outcome.as_ref()),
            Self::Rejected { .. } => None,
        }
    }
}

impl From<MonitorOutcome> for MonitorReport {
    fn from(outcome: MonitorOutcome) -> Self {
        Self::Finished(Box::new(outcome))
    }
}
