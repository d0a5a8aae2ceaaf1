//! prwatch library crate for watching GitHub pull requests.
//!
//! The library parses pull request URLs, reads pull request state, reviews,
//! and check runs through Octocrab, reduces them into status snapshots, and
//! polls until the pull request is merged, closed, or its checks complete.
//! Every session ends in a structured result record rather than an error.

pub mod config;
pub mod github;
pub mod monitor;
pub mod progress;

pub use config::PrwatchConfig;
pub use github::{
    GatewayOptions, MonitorError, OctocrabGateway, PersonalAccessToken, PullRequestGateway,
    PullRequestLocator, PullRequestStatus, StatusAggregator,
};
pub use monitor::{
    MonitorOutcome, MonitorReport, MonitorRequest, MonitoringConfig, TerminationReason, monitor,
};
pub use progress::ProgressSink;
