//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use prwatch::{MonitorError, MonitorReport};

/// Writes the monitoring report to stdout as pretty-printed JSON.
pub fn write_report(report: &MonitorReport) -> Result<(), MonitorError> {
    let mut stdout = io::stdout().lock();
    write_report_to(&mut stdout, report)
}

/// Writes the monitoring report to the given writer as pretty-printed JSON.
pub fn write_report_to<W: Write>(
    writer: &mut W,
    report: &MonitorReport,
) -> Result<(), MonitorError> {
    let rendered = serde_json::to_string_pretty(report).map_err(|error| MonitorError::Io {
        message: format!("could not serialise report: {error}"),
    })?;
    writeln!(writer, "{rendered}").map_err(|error| io_error(&error))
}

/// Converts an I/O error to a [`MonitorError::Io`].
pub fn io_error(error: &io::Error) -> MonitorError {
    MonitorError::Io {
        message: error.to_string(),
    }
}
