//! Pull request monitoring operation.

use prwatch::progress::{ProgressSink, StderrJsonlProgressSink, TracingProgressSink};
use prwatch::{MonitorError, PrwatchConfig, monitor};
use tracing::info;

use super::output::write_report;

/// Monitors the configured pull request and prints the result record.
///
/// Returns whether monitoring ended successfully.
///
/// # Errors
///
/// Returns [`MonitorError::MissingPullRequestUrl`] when no URL is configured,
/// [`MonitorError::Configuration`] when the configuration is inconsistent,
/// and [`MonitorError::Io`] when the report cannot be written.
pub async fn run(config: &PrwatchConfig) -> Result<bool, MonitorError> {
    config.validate()?;
    let request = config.monitor_request()?;
    let options = config.gateway_options();
    if options.token.is_none() {
        info!("no GitHub token configured; using unauthenticated requests");
    }

    let progress: &dyn ProgressSink = if config.jsonl_progress {
        &StderrJsonlProgressSink
    } else {
        &TracingProgressSink
    };
    let report = monitor(&request, &options, progress).await;

    write_report(&report)?;
    Ok(report.is_success())
}
