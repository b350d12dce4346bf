//! The polling loop that drives notification intake.
//!
//! Each cycle fetches notifications with the current [`PollState`], resolves
//! the comment behind every pull request mention in response order,
//! dispatches directed comments to the review agent, and only then advances
//! the cursor. Cycles are separated by a fixed delay and never overlap.
//!
//! Failures are contained to the request that produced them: a failed
//! notifications fetch ends the cycle early, a failed comment fetch skips
//! that mention, and neither is retried before the next scheduled cycle.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::{DispatchRequest, Dispatcher, ReviewAgent};
use crate::github::gateway::{NotificationFetch, NotificationGateway};
use crate::github::mention::{PullRequestMention, pull_request_mentions};
use crate::github::poll_state::PollState;
use crate::telemetry::{FetchStatus, NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Delay between cycles unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Summary of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// How the notifications request ended.
    pub fetch: FetchStatus,
    /// Notifications returned by the request.
    pub notifications: usize,
    /// Notifications that qualified as pull request mentions.
    pub mentions: usize,
    /// Mentions whose comment was fetched successfully.
    pub comments_resolved: usize,
    /// Requests handed to the review agent, in dispatch order.
    pub dispatched: Vec<DispatchRequest>,
}

impl CycleReport {
    const fn failed() -> Self {
        Self {
            fetch: FetchStatus::Failed,
            notifications: 0,
            mentions: 0,
            comments_resolved: 0,
            dispatched: Vec::new(),
        }
    }
}

/// Drives fetch, filter, resolve, and dispatch for the authenticated user.
pub struct Poller<Gateway, Agent> {
    gateway: Gateway,
    dispatcher: Dispatcher<Agent>,
    state: PollState,
    interval: Duration,
    telemetry: Arc<dyn TelemetrySink>,
}

impl<Gateway, Agent> Poller<Gateway, Agent>
where
    Gateway: NotificationGateway,
    Agent: ReviewAgent,
{
    /// Creates a poller starting in timestamp mode at the current time.
    #[must_use]
    pub fn new(gateway: Gateway, agent: Agent) -> Self {
        Self {
            gateway,
            dispatcher: Dispatcher::new(agent),
            state: PollState::starting_now(),
            interval: DEFAULT_POLL_INTERVAL,
            telemetry: Arc::new(NoopTelemetrySink),
        }
    }

    /// Overrides the delay between cycles.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Replaces the initial poll cursor.
    #[must_use]
    pub fn with_state(mut self, state: PollState) -> Self {
        self.state = state;
        self
    }

    /// Routes cycle and dispatch events to the given sink.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Current poll cursor.
    #[must_use]
    pub const fn state(&self) -> &PollState {
        &self.state
    }

    /// Delay between cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs a single cycle without the trailing delay.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let fetch = match self.gateway.notifications(&self.state).await {
            Ok(fetch) => fetch,
            Err(error) => {
                if let Some(info) = error.rate_limit() {
                    tracing::warn!(
                        %error,
                        reset_in_seconds = info.seconds_until_reset(),
                        "notifications rate limited"
                    );
                } else {
                    tracing::warn!(%error, "failed to fetch notifications");
                }
                let report = CycleReport::failed();
                self.record_cycle(&report);
                return report;
            }
        };

        let mut report = CycleReport {
            fetch: match fetch {
                NotificationFetch::NotModified => FetchStatus::NotModified,
                NotificationFetch::Modified { .. } => FetchStatus::Modified,
            },
            notifications: fetch.notifications().len(),
            mentions: 0,
            comments_resolved: 0,
            dispatched: Vec::new(),
        };

        let mentions = pull_request_mentions(fetch.notifications());
        report.mentions = mentions.len();
        for mention in &mentions {
            self.handle_mention(mention, &mut report).await;
        }

        self.state.apply(&fetch);
        self.record_cycle(&report);
        report
    }

    /// Runs `cycles` cycles, sleeping for the interval between them.
    pub async fn run_cycles(&mut self, cycles: usize) -> Vec<CycleReport> {
        let mut reports = Vec::with_capacity(cycles);
        for index in 0..cycles {
            if index > 0 {
                tokio::time::sleep(self.interval).await;
            }
            reports.push(self.run_cycle().await);
        }
        reports
    }

    /// Polls until `shutdown` resolves.
    ///
    /// The shutdown signal is observed at any await point, so an in-flight
    /// cycle is abandoned rather than completed.
    pub async fn run_until<Shutdown>(&mut self, shutdown: Shutdown)
    where
        Shutdown: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!(
            interval_seconds = self.interval.as_secs(),
            "polling notifications"
        );

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested; stopping poller");
                    return;
                }
                () = self.cycle_then_sleep() => {}
            }
        }
    }

    async fn cycle_then_sleep(&mut self) {
        self.run_cycle().await;
        tokio::time::sleep(self.interval).await;
    }

    async fn handle_mention(&self, mention: &PullRequestMention, report: &mut CycleReport) {
        let Some(comment_url) = mention.comment_url.as_deref() else {
            tracing::debug!(
                pull_request = mention.pull_request_url.as_str(),
                "mention has no comment URL; skipping"
            );
            return;
        };

        let comment = match self.gateway.comment(comment_url).await {
            Ok(comment) => comment,
            Err(error) => {
                tracing::warn!(
                    comment_url,
                    %error,
                    "failed to fetch mention comment; skipping"
                );
                return;
            }
        };
        report.comments_resolved += 1;

        tracing::info!(
            commenter = comment.author_login.as_str(),
            comment = comment.body.as_str(),
            "resolved mention comment"
        );

        if let Some(request) = self.dispatcher.dispatch(mention, &comment).await {
            self.telemetry.record(TelemetryEvent::MentionDispatched {
                pull_request_url: request.pull_request_url.clone(),
                commenter: comment.author_login.clone(),
            });
            report.dispatched.push(request);
        }
    }

    fn record_cycle(&self, report: &CycleReport) {
        self.telemetry.record(TelemetryEvent::CycleCompleted {
            fetch: report.fetch,
            notifications: report.notifications,
            mentions: report.mentions,
            dispatched: report.dispatched.len(),
            conditional: self.state.is_conditional(),
        });
    }
}

#[cfg(test)]
mod tests;
