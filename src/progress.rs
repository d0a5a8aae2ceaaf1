//! Progress reporting for monitoring sessions.
//!
//! A monitoring session reports progress through a [`ProgressSink`]: an
//! estimated total, human-readable status messages, and one increment per
//! successful poll. Sinks are synchronous and must not block; the session
//! calls them inline, so events arrive in the order the loop produced them.

use std::io;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

/// A progress update emitted by a monitoring session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Estimated number of polls for the session.
    Total {
        /// Estimated poll count; informational only.
        total: u64,
    },
    /// Human-readable status line.
    Message {
        /// Message text.
        message: String,
    },
    /// Completed poll count advanced.
    Increment {
        /// Amount added to the completed count.
        amount: u64,
    },
}

/// Receives progress updates from a monitoring session.
pub trait ProgressSink: Send + Sync {
    /// Sets the estimated total number of polls.
    fn set_total(&self, total: u64);

    /// Replaces the current status message.
    fn set_message(&self, message: &str);

    /// Advances the completed poll count.
    fn increment(&self, amount: u64);
}

/// Progress sink that drops all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn set_total(&self, _total: u64) {}

    fn set_message(&self, _message: &str) {}

    fn increment(&self, _amount: u64) {}
}

/// Logs status messages through `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn set_total(&self, total: u64) {
        info!(estimated_polls = total, "monitoring started");
    }

    fn set_message(&self, message: &str) {
        info!("{message}");
    }

    fn increment(&self, _amount: u64) {}
}

/// Forwards progress events over an unbounded channel.
///
/// Sending never waits. Updates sent after the receiver has been dropped are
/// discarded.
#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    sender: UnboundedSender<ProgressEvent>,
}

impl ChannelProgressSink {
    /// Creates a sink and the receiver that observes its events.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: ProgressEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("progress receiver dropped");
        }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn set_total(&self, total: u64) {
        self.send(ProgressEvent::Total { total });
    }

    fn set_message(&self, message: &str) {
        self.send(ProgressEvent::Message {
            message: message.to_owned(),
        });
    }

    fn increment(&self, amount: u64) {
        self.send(ProgressEvent::Increment { amount });
    }
}

/// Writes progress events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlProgressSink;

impl StderrJsonlProgressSink {
    fn record(event: &ProgressEvent) {
        let Ok(serialised) = serde_json::to_string(event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

impl ProgressSink for StderrJsonlProgressSink {
    fn set_total(&self, total: u64) {
        Self::record(&ProgressEvent::Total { total });
    }

    fn set_message(&self, message: &str) {
        Self::record(&ProgressEvent::Message {
            message: message.to_owned(),
        });
    }

    fn increment(&self, amount: u64) {
        Self::record(&ProgressEvent::Increment { amount });
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingProgressSink;

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use std::sync::{Mutex, PoisonError};

    use super::{ProgressEvent, ProgressSink};

    /// Captures progress events in memory for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingProgressSink {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingProgressSink {
        /// Returns every event recorded so far.
        #[must_use]
        pub fn events(&self) -> Vec<ProgressEvent> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Returns only the message texts, in order.
        #[must_use]
        pub fn messages(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    ProgressEvent::Message { message } => Some(message),
                    ProgressEvent::Total { .. } | ProgressEvent::Increment { .. } => None,
                })
                .collect()
        }

        /// Sum of all increments.
        #[must_use]
        pub fn completed(&self) -> u64 {
            self.events()
                .iter()
                .map(|event| match event {
                    ProgressEvent::Increment { amount } => *amount,
                    ProgressEvent::Total { .. } | ProgressEvent::Message { .. } => 0,
                })
                .fold(0, u64::saturating_add)
        }

        fn push(&self, event: ProgressEvent) {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event);
        }
    }

    impl ProgressSink for RecordingProgressSink {
        fn set_total(&self, total: u64) {
            self.push(ProgressEvent::Total { total });
        }

        fn set_message(&self, message: &str) {
            self.push(ProgressEvent::Message {
                message: message.to_owned(),
            });
        }

        fn increment(&self, amount: u64) {
            self.push(ProgressEvent::Increment { amount });
        }
    }
}
