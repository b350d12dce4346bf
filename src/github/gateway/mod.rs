//! Gateway for reading notifications and comments through Octocrab.
//!
//! The trait-based design lets the poller be exercised against mocks while
//! the Octocrab implementation handles real HTTP requests.

mod client;
mod error_mapping;
mod http_utils;
mod notifications;

pub use notifications::OctocrabNotificationGateway;

use async_trait::async_trait;

use crate::github::error::WatchError;
use crate::github::models::{Comment, Notification};
use crate::github::poll_state::PollState;

/// Classified result of one notifications request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationFetch {
    /// `304 Not Modified`: nothing new since the conditional token.
    NotModified,
    /// `200 OK` with the decoded notifications.
    Modified {
        /// Notifications in response order, possibly empty.
        notifications: Vec<Notification>,
        /// `Last-Modified` response header, if GitHub sent one.
        last_modified: Option<String>,
    },
}

impl NotificationFetch {
    /// Notifications carried by the response; empty for `304`.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        match self {
            Self::NotModified => &[],
            Self::Modified { notifications, .. } => notifications,
        }
    }
}

/// Gateway that can read the authenticated user's notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Issue one conditional notifications request for the given cursor.
    ///
    /// Statuses other than `200` and `304` are returned as errors.
    async fn notifications(&self, state: &PollState) -> Result<NotificationFetch, WatchError>;

    /// Fetch the comment behind a notification's `latest_comment_url`.
    ///
    /// Any status other than `200` is returned as an error.
    async fn comment(&self, comment_url: &str) -> Result<Comment, WatchError>;
}
