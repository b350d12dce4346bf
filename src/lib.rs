//! Mentionwatch library crate: polls GitHub notifications for pull request
//! mentions and hands directed comments to an automated review agent.
//!
//! The library wraps Octocrab to read the authenticated user's participating
//! notifications incrementally, resolves the comment behind each pull request
//! mention, and dispatches comments that address someone (`@...`) to a
//! [`ReviewAgent`]. The [`Poller`] ties these together on a fixed interval
//! until a shutdown signal resolves.

pub mod config;
pub mod dispatch;
pub mod github;
pub mod poller;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::MentionwatchConfig;
pub use dispatch::{CommandReviewAgent, DispatchRequest, Dispatcher, ReviewAgent};
pub use github::{
    ApiBase, NotificationFetch, NotificationGateway, OctocrabNotificationGateway,
    PersonalAccessToken, PollState, WatchError,
};
pub use poller::{CycleReport, DEFAULT_POLL_INTERVAL, Poller};
pub use telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink};
