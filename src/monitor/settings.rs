//! Validated polling parameters.

use std::ops::RangeInclusive;
use std::time::Duration;

use crate::github::error::MonitorError;

/// Accepted poll interval, in seconds.
pub const POLL_INTERVAL_RANGE: RangeInclusive<f64> = 5.0..=300.0;

/// Accepted overall timeout, in seconds.
pub const MAX_TIMEOUT_RANGE: RangeInclusive<f64> = 60.0..=86_400.0;

/// Poll interval used when the caller does not supply one.
pub const DEFAULT_POLL_INTERVAL_SECONDS: f64 = 30.0;

/// Overall timeout used when the caller does not supply one.
pub const DEFAULT_MAX_TIMEOUT_SECONDS: f64 = 3_600.0;

/// Poll interval and timeout budget for one session.
///
/// Construction rejects out-of-range values; [`MonitoringConfig::with_floors`]
/// raises low values to the minimum first.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use prwatch::monitor::MonitoringConfig;
///
/// let config = MonitoringConfig::with_floors(1.0, 600.0).expect("floored values are valid");
/// assert_eq!(config.poll_interval(), Duration::from_secs(5));
/// assert_eq!(config.estimated_poll_count(), 120);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitoringConfig {
    poll_interval: Duration,
    max_timeout: Duration,
}

impl MonitoringConfig {
    /// Validates both values against their accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Configuration` when either value is outside its
    /// range or is not a finite number.
    pub fn new(poll_interval_seconds: f64, max_timeout_seconds: f64) -> Result<Self, MonitorError> {
        Ok(Self {
            poll_interval: seconds_in_range(
                "poll_interval_seconds",
                poll_interval_seconds,
                &POLL_INTERVAL_RANGE,
            )?,
            max_timeout: seconds_in_range(
                "max_timeout_seconds",
                max_timeout_seconds,
                &MAX_TIMEOUT_RANGE,
            )?,
        })
    }

    /// Raises each value to its minimum, then validates.
    ///
    /// Values above the maximum are still rejected.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Configuration` when a value exceeds its maximum
    /// or is not finite.
    pub fn with_floors(
        poll_interval_seconds: f64,
        max_timeout_seconds: f64,
    ) -> Result<Self, MonitorError> {
        Self::new(
            floor(poll_interval_seconds, *POLL_INTERVAL_RANGE.start()),
            floor(max_timeout_seconds, *MAX_TIMEOUT_RANGE.start()),
        )
    }

    /// Time between polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Overall session budget.
    #[must_use]
    pub const fn max_timeout(&self) -> Duration {
        self.max_timeout
    }

    /// Whole number of poll intervals that fit in the timeout. Informational
    /// only; the loop terminates on elapsed time.
    #[must_use]
    pub fn estimated_poll_count(&self) -> u64 {
        let polls = self
            .max_timeout
            .as_millis()
            .checked_div(self.poll_interval.as_millis())
            .unwrap_or(0);
        u64::try_from(polls).unwrap_or(u64::MAX)
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            max_timeout: Duration::from_hours(1),
        }
    }
}

/// NaN compares false, so it is left for validation to reject.
fn floor(value: f64, minimum: f64) -> f64 {
    if value < minimum { minimum } else { value }
}

fn seconds_in_range(
    name: &str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<Duration, MonitorError> {
    if !range.contains(&value) {
        return Err(MonitorError::Configuration {
            message: format!(
                "{name} must be between {} and {} seconds, got {value}",
                range.start(),
                range.end()
            ),
        });
    }
    Duration::try_from_secs_f64(value).map_err(|error| MonitorError::Configuration {
        message: format!("{name} is not a valid duration: {error}"),
    })
}
