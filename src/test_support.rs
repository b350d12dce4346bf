//! In-memory collaborators for integration tests.
//!
//! Compiled for unit tests and behind the `test-support` feature so that
//! tests under `tests/` can observe dispatches and telemetry without
//! spawning processes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::dispatch::{AgentOutcome, ReviewAgent};
use crate::github::error::WatchError;
use crate::telemetry::{TelemetryEvent, TelemetrySink};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Review agent that records every request and reports success.
#[derive(Debug, Default)]
pub struct RecordingReviewAgent {
    requests: Mutex<Vec<(String, String)>>,
}

impl RecordingReviewAgent {
    /// Creates an agent with no recorded requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `(pull_request_url, comment_body)` pairs in the order received.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, String)> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl ReviewAgent for RecordingReviewAgent {
    async fn handle_request(
        &self,
        pull_request_url: &str,
        comment_body: &str,
    ) -> Result<AgentOutcome, WatchError> {
        lock(&self.requests).push((pull_request_url.to_owned(), comment_body.to_owned()));
        Ok(AgentOutcome::success())
    }
}

/// Telemetry sink that keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingTelemetrySink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingTelemetrySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<TelemetryEvent> {
        lock(&self.events).clone()
    }
}

impl TelemetrySink for RecordingTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        lock(&self.events).push(event);
    }
}
