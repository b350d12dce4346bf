//! Mention filtering for notification records.

use super::models::{MENTION_REASON, Notification, PULL_REQUEST_SUBJECT};

/// A notification that names a pull request mention worth resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestMention {
    /// API URL of the pull request, forwarded to the review agent.
    pub pull_request_url: String,
    /// API URL of the comment that triggered the mention.
    pub comment_url: Option<String>,
}

impl PullRequestMention {
    /// Qualifies a notification when its reason is `mention` and its subject
    /// is a pull request with a URL.
    ///
    /// ```
    /// use mentionwatch::github::{Notification, PullRequestMention};
    ///
    /// let notification = Notification {
    ///     reason: "mention".to_owned(),
    ///     subject_type: "PullRequest".to_owned(),
    ///     subject_url: "https://api.github.com/repos/o/r/pulls/1".to_owned(),
    ///     latest_comment_url: None,
    /// };
    /// assert!(PullRequestMention::from_notification(&notification).is_some());
    /// ```
    #[must_use]
    pub fn from_notification(notification: &Notification) -> Option<Self> {
        if notification.reason != MENTION_REASON
            || notification.subject_type != PULL_REQUEST_SUBJECT
            || notification.subject_url.is_empty()
        {
            return None;
        }

        Some(Self {
            pull_request_url: notification.subject_url.clone(),
            comment_url: notification.latest_comment_url.clone(),
        })
    }
}

/// Selects the pull request mentions from a fetched batch, preserving the
/// response order.
#[must_use]
pub fn pull_request_mentions(notifications: &[Notification]) -> Vec<PullRequestMention> {
    notifications
        .iter()
        .filter_map(PullRequestMention::from_notification)
        .collect()
}
