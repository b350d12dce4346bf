//! GitHub notification polling primitives.
//!
//! This module wraps Octocrab to read the authenticated user's participating
//! notifications incrementally, pick out pull request mentions, and resolve
//! the comment behind each mention. Errors are mapped into user-friendly
//! variants so callers can log precise failures without exposing Octocrab
//! internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod mention;
pub mod models;
pub mod poll_state;
pub mod rate_limit;

pub use error::WatchError;
pub use gateway::{NotificationFetch, NotificationGateway, OctocrabNotificationGateway};
pub use locator::{ApiBase, DEFAULT_API_BASE, PersonalAccessToken};
pub use mention::{PullRequestMention, pull_request_mentions};
pub use models::{Comment, Notification};
pub use poll_state::PollState;
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockNotificationGateway;
