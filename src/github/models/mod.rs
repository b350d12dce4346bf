//! Data models for notification and comment payloads.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into public domain types. Every `Api` field is decoded leniently: a missing,
//! `null`, or wrongly typed value becomes `None` instead of failing the whole
//! response, and the domain conversion applies the defaults once.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

#[cfg(feature = "test-support")]
pub mod test_support;

/// Notification reason GitHub uses when the user was @-mentioned.
pub const MENTION_REASON: &str = "mention";

/// Subject type GitHub uses for pull request threads.
pub const PULL_REQUEST_SUBJECT: &str = "PullRequest";

/// One entry from the notifications endpoint.
///
/// Missing string fields default to empty, which never matches a mention.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    /// Why the user received the notification (e.g. `mention`).
    pub reason: String,
    /// Subject kind (e.g. `PullRequest`, `Issue`).
    pub subject_type: String,
    /// API URL of the subject, which for pull requests is the PR resource.
    pub subject_url: String,
    /// API URL of the comment that triggered the notification, if any.
    pub latest_comment_url: Option<String>,
}

/// Comment resolved from a notification's `latest_comment_url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    /// Raw comment body, empty when GitHub omitted it.
    pub body: String,
    /// Login of the commenting user, empty when unavailable.
    pub author_login: String,
}

impl Comment {
    /// Returns true when the trimmed body starts with `@`, i.e. the comment
    /// addresses someone directly.
    ///
    /// ```
    /// use mentionwatch::github::Comment;
    ///
    /// let comment = Comment {
    ///     body: "  @reviewbot please check\n".to_owned(),
    ///     author_login: "octocat".to_owned(),
    /// };
    /// assert!(comment.is_directed());
    /// ```
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.body.trim().starts_with('@')
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiNotification {
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) reason: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) subject: Option<ApiSubject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiSubject {
    #[serde(default, rename = "type", deserialize_with = "lenient")]
    pub(crate) kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) latest_comment_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiComment {
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) body: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiUser {
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) login: Option<String>,
}

/// Accepts any JSON value and keeps it only when it decodes as `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decodes a notifications response body.
///
/// The body must be a JSON array; entries that are not objects become
/// default (never qualifying) notifications so that ordering and counts are
/// preserved.
pub(crate) fn parse_notifications(body: &str) -> Result<Vec<Notification>, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(body)?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            serde_json::from_value::<ApiNotification>(entry)
                .unwrap_or_default()
                .into()
        })
        .collect())
}

/// Decodes a single comment response body.
pub(crate) fn parse_comment(body: &str) -> Result<Comment, serde_json::Error> {
    serde_json::from_str::<ApiComment>(body).map(Comment::from)
}

impl From<ApiNotification> for Notification {
    fn from(value: ApiNotification) -> Self {
        let subject = value.subject.unwrap_or_default();
        Self {
            reason: value.reason.unwrap_or_default(),
            subject_type: subject.kind.unwrap_or_default(),
            subject_url: subject.url.unwrap_or_default(),
            latest_comment_url: subject.latest_comment_url,
        }
    }
}

impl From<ApiComment> for Comment {
    fn from(value: ApiComment) -> Self {
        Self {
            body: value.body.unwrap_or_default(),
            author_login: value
                .user
                .and_then(|user| user.login)
                .unwrap_or_default(),
        }
    }
}
