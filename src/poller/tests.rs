//! Unit tests for the polling loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use mockall::Sequence;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::{CycleReport, Poller};
use crate::dispatch::{AgentOutcome, DispatchRequest, MockReviewAgent};
use crate::github::{
    Comment, MockNotificationGateway, Notification, NotificationFetch, PollState, RateLimitInfo,
    WatchError,
};
use crate::telemetry::{FetchStatus, TelemetryEvent, TelemetrySink};
use crate::test_support::RecordingTelemetrySink;

const PR_URL: &str = "https://api.github.com/repos/octo/repo/pulls/7";
const OTHER_PR_URL: &str = "https://api.github.com/repos/octo/repo/pulls/8";
const COMMENT_URL: &str = "https://api.github.com/repos/octo/repo/issues/comments/99";
const OTHER_COMMENT_URL: &str = "https://api.github.com/repos/octo/repo/issues/comments/100";
const LAST_MODIFIED: &str = "Sat, 17 Oct 2026 09:31:00 GMT";

#[fixture]
fn start_state() -> PollState {
    let at = Utc
        .with_ymd_and_hms(2026, 10, 17, 9, 30, 0)
        .single()
        .expect("fixed timestamp should be valid");
    PollState::since(at)
}

fn mention(pull_request_url: &str, comment_url: &str) -> Notification {
    Notification {
        reason: "mention".to_owned(),
        subject_type: "PullRequest".to_owned(),
        subject_url: pull_request_url.to_owned(),
        latest_comment_url: Some(comment_url.to_owned()),
    }
}

fn subscribed(pull_request_url: &str) -> Notification {
    Notification {
        reason: "subscribed".to_owned(),
        ..mention(pull_request_url, OTHER_COMMENT_URL)
    }
}

fn comment(body: &str) -> Comment {
    Comment {
        body: body.to_owned(),
        author_login: "octocat".to_owned(),
    }
}

fn modified(notifications: Vec<Notification>, last_modified: Option<&str>) -> NotificationFetch {
    NotificationFetch::Modified {
        notifications,
        last_modified: last_modified.map(ToOwned::to_owned),
    }
}

fn gateway_returning(fetch: NotificationFetch) -> MockNotificationGateway {
    let mut gateway = MockNotificationGateway::new();
    gateway
        .expect_notifications()
        .times(1)
        .returning(move |_| Ok(fetch.clone()));
    gateway
}

fn idle_agent() -> MockReviewAgent {
    let mut agent = MockReviewAgent::new();
    agent.expect_handle_request().never();
    agent
}

#[rstest]
#[tokio::test]
async fn mention_and_noise_dispatch_exactly_once(start_state: PollState) {
    let mut gateway = gateway_returning(modified(
        vec![mention(PR_URL, COMMENT_URL), subscribed(OTHER_PR_URL)],
        Some(LAST_MODIFIED),
    ));
    gateway
        .expect_comment()
        .with(eq(COMMENT_URL))
        .times(1)
        .returning(|_| Ok(comment("@reviewbot please check")));

    let mut agent = MockReviewAgent::new();
    agent
        .expect_handle_request()
        .with(eq(PR_URL), eq("@reviewbot please check"))
        .times(1)
        .returning(|_, _| Ok(AgentOutcome::success()));

    let mut poller = Poller::new(gateway, agent).with_state(start_state);
    let report = poller.run_cycle().await;

    assert_eq!(
        report,
        CycleReport {
            fetch: FetchStatus::Modified,
            notifications: 2,
            mentions: 1,
            comments_resolved: 1,
            dispatched: vec![DispatchRequest {
                pull_request_url: PR_URL.to_owned(),
                comment_text: "@reviewbot please check".to_owned(),
            }],
        }
    );
    assert_eq!(poller.state().conditional_token(), Some(LAST_MODIFIED));
    assert_eq!(poller.state().since_timestamp(), None);
}

#[rstest]
#[tokio::test]
async fn undirected_comment_is_not_dispatched(start_state: PollState) {
    let mut gateway = gateway_returning(modified(vec![mention(PR_URL, COMMENT_URL)], None));
    gateway
        .expect_comment()
        .times(1)
        .returning(|_| Ok(comment("looks good")));

    let mut poller = Poller::new(gateway, idle_agent()).with_state(start_state.clone());
    let report = poller.run_cycle().await;

    assert!(report.dispatched.is_empty(), "nothing should be dispatched");
    assert_eq!(report.comments_resolved, 1);
    assert_eq!(poller.state(), &start_state, "cursor should be unchanged");
}

#[rstest]
#[tokio::test]
async fn not_modified_neither_dispatches_nor_moves_cursor(start_state: PollState) {
    let mut gateway = gateway_returning(NotificationFetch::NotModified);
    gateway.expect_comment().never();

    let mut poller = Poller::new(gateway, idle_agent()).with_state(start_state.clone());
    let report = poller.run_cycle().await;

    assert_eq!(report.fetch, FetchStatus::NotModified);
    assert_eq!(report.notifications, 0);
    assert_eq!(poller.state(), &start_state);
}

#[rstest]
#[tokio::test]
async fn failed_fetch_is_reported_and_cursor_kept(start_state: PollState) {
    let mut gateway = MockNotificationGateway::new();
    gateway.expect_notifications().times(1).returning(|_| {
        Err(WatchError::Api {
            message: "notifications failed with status 502 Bad Gateway".to_owned(),
        })
    });
    gateway.expect_comment().never();

    let mut poller = Poller::new(gateway, idle_agent()).with_state(start_state.clone());
    let report = poller.run_cycle().await;

    assert_eq!(report.fetch, FetchStatus::Failed);
    assert_eq!(poller.state(), &start_state);
}

#[rstest]
#[tokio::test]
async fn rate_limited_fetch_is_reported_as_failed_cycle(start_state: PollState) {
    let mut gateway = MockNotificationGateway::new();
    gateway.expect_notifications().times(1).returning(|_| {
        Err(WatchError::RateLimitExceeded {
            rate_limit: Some(RateLimitInfo::new(5000, 0, 1_700_000_000)),
            message: "API rate limit exceeded".to_owned(),
        })
    });
    gateway.expect_comment().never();
    let sink = Arc::new(RecordingTelemetrySink::new());

    let mut poller = Poller::new(gateway, idle_agent())
        .with_state(start_state.clone())
        .with_telemetry(Arc::clone(&sink) as Arc<dyn TelemetrySink>);
    let report = poller.run_cycle().await;

    assert_eq!(report.fetch, FetchStatus::Failed);
    assert_eq!(poller.state(), &start_state);
    assert_eq!(
        sink.events(),
        vec![TelemetryEvent::CycleCompleted {
            fetch: FetchStatus::Failed,
            notifications: 0,
            mentions: 0,
            dispatched: 0,
            conditional: false,
        }]
    );
}

#[rstest]
#[tokio::test]
async fn comment_failure_skips_only_that_mention(start_state: PollState) {
    let mut gateway = gateway_returning(modified(
        vec![
            mention(PR_URL, COMMENT_URL),
            mention(OTHER_PR_URL, OTHER_COMMENT_URL),
        ],
        None,
    ));
    let mut sequence = Sequence::new();
    gateway
        .expect_comment()
        .with(eq(COMMENT_URL))
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| {
            Err(WatchError::Api {
                message: "comment failed with status 404 Not Found".to_owned(),
            })
        });
    gateway
        .expect_comment()
        .with(eq(OTHER_COMMENT_URL))
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(comment("@reviewbot review")));

    let mut agent = MockReviewAgent::new();
    agent
        .expect_handle_request()
        .with(eq(OTHER_PR_URL), eq("@reviewbot review"))
        .times(1)
        .returning(|_, _| Ok(AgentOutcome::success()));

    let mut poller = Poller::new(gateway, agent).with_state(start_state);
    let report = poller.run_cycle().await;

    assert_eq!(report.mentions, 2);
    assert_eq!(report.comments_resolved, 1);
    assert_eq!(report.dispatched.len(), 1);
}

#[rstest]
#[tokio::test]
async fn mention_without_comment_url_is_skipped(start_state: PollState) {
    let notification = Notification {
        latest_comment_url: None,
        ..mention(PR_URL, COMMENT_URL)
    };
    let mut gateway = gateway_returning(modified(vec![notification], None));
    gateway.expect_comment().never();

    let mut poller = Poller::new(gateway, idle_agent()).with_state(start_state);
    let report = poller.run_cycle().await;

    assert_eq!(report.mentions, 1);
    assert_eq!(report.comments_resolved, 0);
}

#[rstest]
#[tokio::test]
async fn agent_failure_does_not_affect_cursor(start_state: PollState) {
    let mut gateway = gateway_returning(modified(
        vec![mention(PR_URL, COMMENT_URL)],
        Some(LAST_MODIFIED),
    ));
    gateway
        .expect_comment()
        .returning(|_| Ok(comment("@reviewbot review")));

    let mut agent = MockReviewAgent::new();
    agent.expect_handle_request().times(1).returning(|_, _| {
        Err(WatchError::Agent {
            message: "spawn failed".to_owned(),
        })
    });

    let mut poller = Poller::new(gateway, agent).with_state(start_state);
    let report = poller.run_cycle().await;

    assert_eq!(report.dispatched.len(), 1);
    assert_eq!(poller.state().conditional_token(), Some(LAST_MODIFIED));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn second_cycle_uses_adopted_conditional_token(start_state: PollState) {
    let mut gateway = MockNotificationGateway::new();
    let mut sequence = Sequence::new();
    gateway
        .expect_notifications()
        .withf(|state| state.since_timestamp() == Some("2026-10-17T09:30:00.000000Z"))
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(modified(Vec::new(), Some(LAST_MODIFIED))));
    gateway
        .expect_notifications()
        .withf(|state| state.conditional_token() == Some(LAST_MODIFIED))
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_| Ok(NotificationFetch::NotModified));

    let mut poller = Poller::new(gateway, idle_agent()).with_state(start_state);
    let started = tokio::time::Instant::now();
    let reports = poller.run_cycles(2).await;

    let statuses: Vec<_> = reports.iter().map(|report| report.fetch).collect();
    assert_eq!(statuses, vec![FetchStatus::Modified, FetchStatus::NotModified]);
    assert_eq!(
        started.elapsed(),
        Duration::from_secs(5),
        "cycles should be separated by the default interval"
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn run_until_stops_on_shutdown(start_state: PollState) {
    let mut gateway = MockNotificationGateway::new();
    gateway
        .expect_notifications()
        .times(3)
        .returning(|_| Ok(NotificationFetch::NotModified));

    let mut poller = Poller::new(gateway, idle_agent())
        .with_state(start_state)
        .with_interval(Duration::from_secs(5));

    poller
        .run_until(tokio::time::sleep(Duration::from_secs(12)))
        .await;
}

#[rstest]
#[tokio::test]
async fn telemetry_records_dispatch_and_cycle(start_state: PollState) {
    let mut gateway = gateway_returning(modified(
        vec![mention(PR_URL, COMMENT_URL)],
        Some(LAST_MODIFIED),
    ));
    gateway
        .expect_comment()
        .returning(|_| Ok(comment("@reviewbot review")));
    let mut agent = MockReviewAgent::new();
    agent
        .expect_handle_request()
        .returning(|_, _| Ok(AgentOutcome::success()));
    let sink = Arc::new(RecordingTelemetrySink::new());

    let mut poller = Poller::new(gateway, agent)
        .with_state(start_state)
        .with_telemetry(Arc::clone(&sink) as Arc<dyn TelemetrySink>);
    poller.run_cycle().await;

    assert_eq!(
        sink.events(),
        vec![
            TelemetryEvent::MentionDispatched {
                pull_request_url: PR_URL.to_owned(),
                commenter: "octocat".to_owned(),
            },
            TelemetryEvent::CycleCompleted {
                fetch: FetchStatus::Modified,
                notifications: 1,
                mentions: 1,
                dispatched: 1,
                conditional: true,
            },
        ]
    );
}
