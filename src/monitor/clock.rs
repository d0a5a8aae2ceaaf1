//! Time source for monitoring sessions.
//!
//! The session reads elapsed time, wall-clock time, and sleeps through
//! [`Clock`], so the polling state machine can run against a manual clock
//! in tests instead of real timers.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::Instant;

/// Monotonic and wall-clock time plus the ability to sleep.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic time since the clock was created.
    fn elapsed(&self) -> Duration;

    /// Current Unix time in whole seconds.
    fn unix_seconds(&self) -> u64;

    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the Tokio timer and the system wall clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    /// Starts a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn unix_seconds(&self) -> u64 {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use manual::ManualClock;

#[cfg(any(test, feature = "test-support"))]
mod manual {
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::Clock;

    #[derive(Debug, Default)]
    struct ManualState {
        elapsed: Duration,
        sleeps: Vec<Duration>,
    }

    /// Clock that only moves when told to. Sleeping advances it instantly and
    /// records the requested duration.
    #[derive(Debug, Default)]
    pub struct ManualClock {
        unix_origin: u64,
        state: Mutex<ManualState>,
    }

    impl ManualClock {
        /// Creates a clock whose wall time starts at `unix_origin`.
        #[must_use]
        pub fn starting_at(unix_origin: u64) -> Self {
            Self {
                unix_origin,
                state: Mutex::new(ManualState::default()),
            }
        }

        /// Moves the clock forward without recording a sleep.
        pub fn advance(&self, duration: Duration) {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.elapsed = state.elapsed.saturating_add(duration);
        }

        /// Durations passed to [`Clock::sleep`], in call order.
        #[must_use]
        pub fn sleeps(&self) -> Vec<Duration> {
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .sleeps
                .clone()
        }
    }

    #[async_trait]
    impl Clock for ManualClock {
        fn elapsed(&self) -> Duration {
            self.state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .elapsed
        }

        fn unix_seconds(&self) -> u64 {
            self.unix_origin.saturating_add(self.elapsed().as_secs())
        }

        async fn sleep(&self, duration: Duration) {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.elapsed = state.elapsed.saturating_add(duration);
            state.sleeps.push(duration);
        }
    }
}
