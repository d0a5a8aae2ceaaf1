//! Aggregation of pull request data into a single status snapshot.
//!
//! One pull request fetch supplies the head commit; reviews, the combined
//! commit status, and check runs for that commit are then read concurrently.
//! Raw payloads are validated here: any missing required field fails the
//! whole snapshot.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::error::MonitorError;
use super::gateway::PullRequestGateway;
use super::locator::PullRequestLocator;
use super::models::{
    ApiCheckRun, ApiCombinedStatus, ApiPullRequest, ApiReview, CheckConclusion, CheckRun,
    CheckStatus, CombinedStatus, PullRequestStatus, Review, ReviewDecision, ReviewState,
};

/// Builds [`PullRequestStatus`] snapshots through a gateway.
pub struct StatusAggregator<'client, G>
where
    G: PullRequestGateway + ?Sized,
{
    gateway: &'client G,
}

impl<'client, G> StatusAggregator<'client, G>
where
    G: PullRequestGateway + ?Sized,
{
    /// Wraps a gateway.
    #[must_use]
    pub const fn new(gateway: &'client G) -> Self {
        Self { gateway }
    }

    /// Reads the pull request and its reviews, commit status, and check runs,
    /// and reduces them into a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors unchanged and returns
    /// `MonitorError::MalformedResponse` when a payload lacks a required
    /// field or carries an unknown enum value.
    pub async fn build_status(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestStatus, MonitorError> {
        let pull_request: ApiPullRequest =
            decode("pull request", self.gateway.pull_request(locator).await?)?;
        let sha = pull_request.head.sha.as_str();

        let (raw_reviews, raw_status, raw_checks) = tokio::try_join!(
            self.gateway.reviews(locator),
            self.gateway.commit_status(locator, sha),
            self.gateway.check_runs(locator, sha),
        )?;

        let reviews = decode_all::<ApiReview, Review>("review", raw_reviews)?;
        let check_runs = decode_all::<ApiCheckRun, CheckRun>("check run", raw_checks)?;
        let combined: ApiCombinedStatus = decode("commit status", raw_status)?;

        debug!(
            pull_request = %locator,
            reviews = reviews.len(),
            check_runs = check_runs.len(),
            "assembled status snapshot"
        );
        Ok(assemble(
            locator,
            pull_request,
            CombinedStatus::from(combined),
            check_runs,
            reviews,
        ))
    }
}

fn assemble(
    locator: &PullRequestLocator,
    pull_request: ApiPullRequest,
    combined_commit_status: CombinedStatus,
    check_runs: Vec<CheckRun>,
    reviews: Vec<Review>,
) -> PullRequestStatus {
    let all_checks_complete = all_checks_complete(&check_runs);
    let checks_passing = checks_passing(&check_runs);
    let review_decision = review_decision(&reviews);

    PullRequestStatus {
        number: locator.number().get(),
        title: pull_request.title,
        author: pull_request.user.into(),
        state: pull_request.state,
        is_merged: pull_request.merged.unwrap_or(false),
        is_draft: pull_request.draft.unwrap_or(false),
        head_sha: pull_request.head.sha,
        combined_commit_status,
        check_runs,
        all_checks_complete,
        checks_passing,
        reviews,
        review_decision,
        labels: pull_request
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect(),
        assignees: pull_request
            .assignees
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect(),
        comment_count: pull_request.comments.unwrap_or(0),
        updated_at: pull_request.updated_at,
    }
}

fn decode<T: DeserializeOwned>(what: &str, value: Value) -> Result<T, MonitorError> {
    serde_json::from_value(value).map_err(|error| MonitorError::MalformedResponse {
        message: format!("{what} payload invalid: {error}"),
    })
}

fn decode_all<A, T>(what: &str, values: Vec<Value>) -> Result<Vec<T>, MonitorError>
where
    A: DeserializeOwned + Into<T>,
{
    values
        .into_iter()
        .map(|value| decode::<A>(what, value).map(Into::into))
        .collect()
}

/// True when there are no check runs or every run has completed.
#[must_use]
pub fn all_checks_complete(check_runs: &[CheckRun]) -> bool {
    check_runs
        .iter()
        .all(|run| run.status == CheckStatus::Completed)
}

/// True when every check has completed with a success, skipped, or neutral
/// conclusion. An empty set passes.
#[must_use]
pub fn checks_passing(check_runs: &[CheckRun]) -> bool {
    all_checks_complete(check_runs)
        && check_runs
            .iter()
            .all(|run| run.conclusion.is_some_and(CheckConclusion::is_passing))
}

/// Reduces reviews to a single verdict.
///
/// Only approvals and change requests count. Each reviewer's latest counted
/// review is kept; a later review replaces the kept one only when both carry
/// a timestamp and the newer one is strictly later. Any kept change request
/// wins over approvals.
#[must_use]
pub fn review_decision(reviews: &[Review]) -> Option<ReviewDecision> {
    let mut latest: HashMap<&str, &Review> = HashMap::new();

    for review in reviews.iter().filter(|review| is_verdict(review.state)) {
        match latest.entry(review.user_login.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(review);
            }
            Entry::Occupied(mut slot) => {
                if supersedes(review, slot.get()) {
                    slot.insert(review);
                }
            }
        }
    }

    if latest.is_empty() {
        return None;
    }

    let changes_requested = latest
        .values()
        .any(|review| review.state == ReviewState::ChangesRequested);
    Some(if changes_requested {
        ReviewDecision::ChangesRequested
    } else {
        ReviewDecision::Approved
    })
}

const fn is_verdict(state: ReviewState) -> bool {
    matches!(state, ReviewState::Approved | ReviewState::ChangesRequested)
}

fn supersedes(candidate: &Review, kept: &Review) -> bool {
    match (candidate.submitted_at, kept.submitted_at) {
        (Some(candidate_at), Some(kept_at)) => candidate_at > kept_at,
        _ => false,
    }
}
