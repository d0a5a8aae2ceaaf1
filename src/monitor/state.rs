//! Session states and the pure decisions that move between them.

use std::time::Duration;

use crate::github::error::MonitorError;
use crate::github::models::{PullRequestState, PullRequestStatus};
use crate::github::rate_limit::RateLimitInfo;

use super::outcome::{MonitorOutcome, TerminationReason};

/// Longest single wait while rate limited, so progress keeps flowing when the
/// reset is far away.
pub const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_mins(1);

/// Where a monitoring session is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Reporting the session start; no request made yet.
    Starting,
    /// About to check the timeout and fetch a snapshot.
    Polling,
    /// Sleeping before the next fetch.
    Waiting {
        /// How long to sleep.
        duration: Duration,
        /// Why the session is sleeping.
        cause: WaitCause,
    },
    /// The session has ended.
    Finished(Box<MonitorOutcome>),
}

impl SessionState {
    /// Ends the session with `outcome`.
    #[must_use]
    pub fn finished(outcome: MonitorOutcome) -> Self {
        Self::Finished(Box::new(outcome))
    }
}

/// Reason for a wait between fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCause {
    /// Regular cadence after a non-terminal snapshot.
    PollInterval,
    /// Retrying after a transport failure.
    NetworkRetry,
    /// Waiting for the rate limit to reset.
    RateLimit,
}

/// What to do about a rate-limited fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Sleep for this long, then fetch again.
    Wait {
        /// Seconds until the reset, as reported to the user.
        reset_in_seconds: u64,
        /// Capped sleep duration.
        sleep: Duration,
    },
    /// The reset lands after the timeout budget runs out.
    Exceeded {
        /// Seconds until the reset.
        reset_in_seconds: u64,
    },
}

impl RateLimitDecision {
    /// Seconds until the quota resets.
    #[must_use]
    pub const fn reset_in_seconds(&self) -> u64 {
        match self {
            Self::Wait {
                reset_in_seconds, ..
            }
            | Self::Exceeded { reset_in_seconds } => *reset_in_seconds,
        }
    }
}

/// How the session treats a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction<'error> {
    /// Wait for the quota to reset.
    AwaitRateLimit(RateLimitInfo),
    /// Report and retry on the normal cadence.
    Retry {
        /// Transport error detail for the progress message.
        detail: &'error str,
    },
    /// End the session with `api_error`.
    Abort,
}

impl<'error> FailureAction<'error> {
    /// Classifies a gateway or aggregation error.
    #[must_use]
    pub const fn for_error(error: &'error MonitorError) -> Self {
        match error {
            MonitorError::RateLimitExceeded { rate_limit } => Self::AwaitRateLimit(*rate_limit),
            MonitorError::Network { message } => Self::Retry {
                detail: message.as_str(),
            },
            _ => Self::Abort,
        }
    }
}

/// Termination check applied to every successful snapshot.
///
/// Merged wins over closed, and closed wins over completed checks.
#[must_use]
pub fn termination_reason(status: &PullRequestStatus) -> Option<TerminationReason> {
    if status.is_merged {
        Some(TerminationReason::Merged)
    } else if status.state == PullRequestState::Closed {
        Some(TerminationReason::Closed)
    } else if status.all_checks_complete {
        Some(TerminationReason::ChecksComplete)
    } else {
        None
    }
}

/// Decides whether to wait out a rate limit.
///
/// The wait is the time until reset; waiting is refused when that exceeds
/// `remaining_budget`. Otherwise the session sleeps one second past the reset,
/// capped at [`MAX_RATE_LIMIT_WAIT`].
#[must_use]
pub fn rate_limit_backoff(
    rate_limit: &RateLimitInfo,
    now_unix: u64,
    remaining_budget: Duration,
) -> RateLimitDecision {
    let reset_in_seconds = rate_limit.seconds_until_reset(now_unix);
    if Duration::from_secs(reset_in_seconds) > remaining_budget {
        return RateLimitDecision::Exceeded { reset_in_seconds };
    }
    let sleep = Duration::from_secs(reset_in_seconds.saturating_add(1)).min(MAX_RATE_LIMIT_WAIT);
    RateLimitDecision::Wait {
        reset_in_seconds,
        sleep,
    }
}
