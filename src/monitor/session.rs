//! The polling loop for one monitoring session.

use tracing::{debug, info, warn};

use crate::github::error::MonitorError;
use crate::github::gateway::PullRequestGateway;
use crate::github::locator::PullRequestLocator;
use crate::github::models::{PullRequestStatus, ReviewDecision};
use crate::github::rate_limit::RateLimitInfo;
use crate::github::status::StatusAggregator;
use crate::progress::ProgressSink;

use super::clock::Clock;
use super::outcome::MonitorOutcome;
use super::settings::MonitoringConfig;
use super::state::{
    FailureAction, RateLimitDecision, SessionState, WaitCause, rate_limit_backoff,
    termination_reason,
};

/// Drives repeated status fetches for one pull request until a terminal
/// outcome.
///
/// The session owns the poll counter and the most recent snapshot; nothing
/// is shared with other sessions.
pub struct MonitorSession<'session, G>
where
    G: PullRequestGateway + ?Sized,
{
    locator: &'session PullRequestLocator,
    config: MonitoringConfig,
    gateway: &'session G,
    clock: &'session dyn Clock,
    progress: &'session dyn ProgressSink,
    poll_count: u64,
    last_status: Option<PullRequestStatus>,
}

impl<'session, G> MonitorSession<'session, G>
where
    G: PullRequestGateway + ?Sized,
{
    /// Prepares a session; nothing is fetched until [`Self::run`].
    #[must_use]
    pub const fn new(
        locator: &'session PullRequestLocator,
        config: MonitoringConfig,
        gateway: &'session G,
        clock: &'session dyn Clock,
        progress: &'session dyn ProgressSink,
    ) -> Self {
        Self {
            locator,
            config,
            gateway,
            clock,
            progress,
            poll_count: 0,
            last_status: None,
        }
    }

    /// Runs the state machine to completion.
    ///
    /// Every exit path produces an outcome; errors never escape.
    pub async fn run(mut self) -> MonitorOutcome {
        let mut state = SessionState::Starting;
        loop {
            state = match state {
                SessionState::Starting => self.start(),
                SessionState::Polling => self.poll().await,
                SessionState::Waiting { duration, cause } => {
                    debug!(?cause, seconds = duration.as_secs_f64(), "sleeping");
                    self.clock.sleep(duration).await;
                    SessionState::Polling
                }
                SessionState::Finished(outcome) => {
                    info!(
                        pull_request = %self.locator,
                        reason = %outcome.reason,
                        success = outcome.success,
                        polls = outcome.poll_count,
                        "monitoring finished"
                    );
                    return *outcome;
                }
            };
        }
    }

    fn start(&self) -> SessionState {
        info!(
            pull_request = %self.locator,
            poll_interval_seconds = self.config.poll_interval().as_secs_f64(),
            max_timeout_seconds = self.config.max_timeout().as_secs_f64(),
            "monitoring started"
        );
        self.progress.set_total(self.config.estimated_poll_count());
        self.progress
            .set_message(&format!("Starting monitor for {}", self.locator));

        let mode = if self.gateway.is_authenticated() {
            "authenticated"
        } else {
            "unauthenticated"
        };
        self.progress.set_message(&format!("Connected ({mode})"));
        SessionState::Polling
    }

    async fn poll(&mut self) -> SessionState {
        let elapsed = self.clock.elapsed();
        if elapsed >= self.config.max_timeout() {
            self.progress.set_message("Timeout reached");
            return SessionState::finished(MonitorOutcome::timeout(
                elapsed,
                self.poll_count,
                self.last_status.take(),
            ));
        }

        self.poll_count = self.poll_count.saturating_add(1);
        debug!(attempt = self.poll_count, "fetching status");
        match StatusAggregator::new(self.gateway)
            .build_status(self.locator)
            .await
        {
            Ok(status) => self.on_snapshot(status),
            Err(error) => self.on_failure(&error),
        }
    }

    fn on_snapshot(&mut self, status: PullRequestStatus) -> SessionState {
        self.progress.increment(1);
        let checks = if status.all_checks_complete {
            "complete"
        } else {
            "pending"
        };
        let reviews = status
            .review_decision
            .map_or("none", ReviewDecision::as_str);
        self.progress.set_message(&format!(
            "Poll #{}: {} | Checks: {checks} | Reviews: {reviews}",
            self.poll_count, status.state
        ));

        if let Some(reason) = termination_reason(&status) {
            return SessionState::finished(MonitorOutcome::terminal(
                reason,
                self.clock.elapsed(),
                self.poll_count,
                status,
            ));
        }

        self.last_status = Some(status);
        SessionState::Waiting {
            duration: self.config.poll_interval(),
            cause: WaitCause::PollInterval,
        }
    }

    fn on_failure(&mut self, error: &MonitorError) -> SessionState {
        match FailureAction::for_error(error) {
            FailureAction::AwaitRateLimit(rate_limit) => self.on_rate_limit(&rate_limit),
            FailureAction::Retry { detail } => {
                self.progress
                    .set_message(&format!("Network error: {detail}. Retrying..."));
                warn!(error = detail, "network error; retrying");
                SessionState::Waiting {
                    duration: self.config.poll_interval(),
                    cause: WaitCause::NetworkRetry,
                }
            }
            FailureAction::Abort => {
                warn!(%error, "monitoring aborted");
                SessionState::finished(MonitorOutcome::api_error(
                    error,
                    self.clock.elapsed(),
                    self.poll_count,
                    self.last_status.take(),
                ))
            }
        }
    }

    fn on_rate_limit(&mut self, rate_limit: &RateLimitInfo) -> SessionState {
        let elapsed = self.clock.elapsed();
        let remaining = self.config.max_timeout().saturating_sub(elapsed);
        let decision = rate_limit_backoff(rate_limit, self.clock.unix_seconds(), remaining);
        let reset_in_seconds = decision.reset_in_seconds();
        self.progress
            .set_message(&format!("Rate limited. Waiting {reset_in_seconds}s..."));

        match decision {
            RateLimitDecision::Exceeded { .. } => {
                warn!(reset_in_seconds, "rate limit outlasts the timeout budget");
                SessionState::finished(MonitorOutcome::rate_limit_timeout(
                    elapsed,
                    self.poll_count,
                    self.last_status.take(),
                ))
            }
            RateLimitDecision::Wait { sleep, .. } => {
                warn!(reset_in_seconds, "rate limited; waiting for reset");
                SessionState::Waiting {
                    duration: sleep,
                    cause: WaitCause::RateLimit,
                }
            }
        }
    }
}
