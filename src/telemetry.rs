//! Poller telemetry events and sinks.
//!
//! Telemetry complements `tracing` logs with one machine-readable record per
//! cycle and per dispatch, so a long-running poller can be audited without
//! parsing free-form log lines.

use std::io;

use serde::{Deserialize, Serialize};

/// How the notifications request of a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// `200 OK` with a (possibly empty) notification list.
    Modified,
    /// `304 Not Modified`.
    NotModified,
    /// Any other status or a transport failure.
    Failed,
}

/// A structured telemetry event emitted by the poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A mention was handed to the review agent.
    MentionDispatched {
        /// API URL of the pull request.
        pull_request_url: String,
        /// Login of the commenting user, empty when unknown.
        commenter: String,
    },
    /// A poll cycle finished.
    CycleCompleted {
        /// Outcome of the notifications request.
        fetch: FetchStatus,
        /// Notifications returned by the request.
        notifications: usize,
        /// Notifications that qualified as pull request mentions.
        mentions: usize,
        /// Mentions dispatched to the review agent.
        dispatched: usize,
        /// Whether the poll cursor is in conditional mode after the cycle.
        conditional: bool,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}
