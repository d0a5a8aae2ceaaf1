//! GitHub pull request access and status aggregation.
//!
//! This module parses pull request URLs, reads pull request data through
//! Octocrab, and reduces it into [`PullRequestStatus`] snapshots. Octocrab
//! failures and HTTP statuses are classified into [`MonitorError`] so the
//! monitor can decide between retrying and giving up.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod status;

pub use error::MonitorError;
pub use gateway::{DEFAULT_API_BASE, GatewayOptions, OctocrabGateway, PullRequestGateway};
pub use locator::{
    PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner,
};
pub use models::{
    CheckConclusion, CheckRun, CheckStatus, CombinedStatus, Label, PullRequestState,
    PullRequestStatus, Review, ReviewDecision, ReviewState, User,
};
pub use rate_limit::RateLimitInfo;
pub use status::StatusAggregator;

#[cfg(test)]
pub use gateway::MockPullRequestGateway;

#[cfg(test)]
mod tests;
