//! Data models for pull request status snapshots.
//!
//! Public types form the snapshot handed to callers and serialised into the
//! monitoring result. Types prefixed with `Api` are internal deserialisation
//! targets for raw GitHub payloads; decoding into them is where required
//! fields are enforced.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pull request state as reported by GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// The pull request is open.
    Open,
    /// The pull request was closed, merged or not.
    Closed,
}

impl PullRequestState {
    /// Returns the lowercase API spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// State of a single pull request review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved the changes.
    Approved,
    /// Reviewer asked for changes.
    ChangesRequested,
    /// Reviewer left comments without a verdict.
    Commented,
    /// Review has been started but not submitted.
    Pending,
    /// Review was dismissed.
    Dismissed,
}

/// Lifecycle status of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Waiting for a runner.
    Queued,
    /// Currently running.
    InProgress,
    /// Finished; a conclusion is available.
    Completed,
    /// Waiting on a deployment protection rule.
    Waiting,
    /// Pending start.
    Pending,
    /// Requested but not yet queued.
    Requested,
}

/// Outcome of a completed check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// The check passed.
    Success,
    /// The check failed.
    Failure,
    /// The check finished without a verdict.
    Neutral,
    /// The check was cancelled.
    Cancelled,
    /// The check was skipped.
    Skipped,
    /// The check ran out of time.
    TimedOut,
    /// The check needs manual action.
    ActionRequired,
    /// The check went stale.
    Stale,
}

impl CheckConclusion {
    /// Returns true for conclusions that do not block a pull request.
    #[must_use]
    pub const fn is_passing(self) -> bool {
        matches!(self, Self::Success | Self::Skipped | Self::Neutral)
    }
}

/// Legacy combined commit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombinedStatus {
    /// Every status reported success.
    Success,
    /// At least one status is still pending, or none were reported.
    #[default]
    Pending,
    /// At least one status failed.
    Failure,
}

/// Reduced verdict across all reviewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    /// Every counted reviewer approved.
    Approved,
    /// At least one counted reviewer asked for changes.
    ChangesRequested,
}

impl ReviewDecision {
    /// Returns the upper-case API spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::ChangesRequested => "CHANGES_REQUESTED",
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// GitHub user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct User {
    /// Login name.
    pub login: String,
    /// Numeric account identifier.
    pub id: u64,
}

/// Pull request label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Label {
    /// Label name.
    pub name: String,
    /// Hex colour without the leading `#`, when GitHub reports one.
    pub color: Option<String>,
}

/// A submitted (or pending) pull request review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    /// Review identifier.
    pub id: u64,
    /// Login of the reviewer.
    pub user_login: String,
    /// Review verdict.
    pub state: ReviewState,
    /// Submission time; absent for pending reviews.
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A single CI check run for the head commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRun {
    /// Check run identifier.
    pub id: u64,
    /// Check name.
    pub name: String,
    /// Lifecycle status.
    pub status: CheckStatus,
    /// Outcome; only present once the run has completed.
    pub conclusion: Option<CheckConclusion>,
    /// Link to the run on github.com.
    pub html_url: Option<String>,
}

/// Point-in-time snapshot of a pull request's state, checks, and reviews.
///
/// A new snapshot is built on every poll; snapshots are never patched.
#[expect(
    clippy::struct_excessive_bools,
    reason = "flags mirror independent GitHub fields in the result record"
)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestStatus {
    /// Pull request number.
    pub number: u64,
    /// Pull request title.
    pub title: String,
    /// Pull request author.
    pub author: User,
    /// Open or closed.
    pub state: PullRequestState,
    /// Whether the pull request has been merged.
    pub is_merged: bool,
    /// Whether the pull request is a draft.
    pub is_draft: bool,
    /// Head commit the checks and statuses were read for.
    pub head_sha: String,
    /// Legacy combined commit status for the head commit.
    pub combined_commit_status: CombinedStatus,
    /// Check runs for the head commit, in API order.
    pub check_runs: Vec<CheckRun>,
    /// True when there are no check runs or every run has completed.
    pub all_checks_complete: bool,
    /// True when all checks are complete and none of them failed.
    pub checks_passing: bool,
    /// Reviews in API order.
    pub reviews: Vec<Review>,
    /// Reduced review verdict, if any reviewer approved or asked for changes.
    pub review_decision: Option<ReviewDecision>,
    /// Labels attached to the pull request.
    pub labels: Vec<Label>,
    /// Assigned users.
    pub assignees: Vec<User>,
    /// Number of issue comments.
    pub comment_count: u64,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl PullRequestStatus {
    /// Returns true once monitoring can stop: the pull request is merged,
    /// closed, or every check has completed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.is_merged || self.state == PullRequestState::Closed || self.all_checks_complete
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) title: String,
    pub(super) user: ApiUser,
    pub(super) state: PullRequestState,
    #[serde(default)]
    pub(super) merged: Option<bool>,
    #[serde(default)]
    pub(super) draft: Option<bool>,
    pub(super) head: ApiHead,
    #[serde(default)]
    pub(super) labels: Option<Vec<ApiLabel>>,
    #[serde(default)]
    pub(super) assignees: Option<Vec<ApiUser>>,
    #[serde(default)]
    pub(super) comments: Option<u64>,
    pub(super) updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiHead {
    pub(super) sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: String,
    pub(super) id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiLabel {
    pub(super) name: String,
    #[serde(default)]
    pub(super) color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReview {
    pub(super) id: u64,
    pub(super) user: ApiReviewer,
    pub(super) state: ReviewState,
    #[serde(default)]
    pub(super) submitted_at: Option<DateTime<Utc>>,
}

/// Reviews only need the login, so the id is not required here.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReviewer {
    pub(super) login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCheckRun {
    pub(super) id: u64,
    pub(super) name: String,
    pub(super) status: CheckStatus,
    #[serde(default)]
    pub(super) conclusion: Option<CheckConclusion>,
    #[serde(default)]
    pub(super) html_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCombinedStatus {
    #[serde(default)]
    pub(super) state: Option<CombinedStatus>,
}

impl From<ApiUser> for User {
    fn from(value: ApiUser) -> Self {
        Self {
            login: value.login,
            id: value.id,
        }
    }
}

impl From<ApiLabel> for Label {
    fn from(value: ApiLabel) -> Self {
        Self {
            name: value.name,
            color: value.color,
        }
    }
}

impl From<ApiReview> for Review {
    fn from(value: ApiReview) -> Self {
        Self {
            id: value.id,
            user_login: value.user.login,
            state: value.state,
            submitted_at: value.submitted_at,
        }
    }
}

impl From<ApiCheckRun> for CheckRun {
    fn from(value: ApiCheckRun) -> Self {
        Self {
            id: value.id,
            name: value.name,
            status: value.status,
            conclusion: value.conclusion,
            html_url: value.html_url,
        }
    }
}

impl From<ApiCombinedStatus> for CombinedStatus {
    fn from(value: ApiCombinedStatus) -> Self {
        value.state.unwrap_or_default()
    }
}
