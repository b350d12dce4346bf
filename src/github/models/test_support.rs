//! Test helpers for building notification and comment payloads.
//!
//! The builders return `serde_json::Value` shaped like GitHub responses so
//! that `wiremock` servers and unit tests share the same fixtures.
//!
//! # Examples
//!
//! ```
//! use mentionwatch::github::models::test_support::{comment_json, mention_json};
//!
//! let notification = mention_json("https://api.github.com/repos/o/r/pulls/1", "https://api.github.com/c/1");
//! assert_eq!(notification["reason"], "mention");
//!
//! let comment = comment_json("@bot review", "alice");
//! assert_eq!(comment["user"]["login"], "alice");
//! ```

use serde_json::{Value, json};

/// Builds a notification entry with the given reason and subject type.
#[must_use]
pub fn notification_json(
    reason: &str,
    subject_type: &str,
    subject_url: &str,
    latest_comment_url: Option<&str>,
) -> Value {
    json!({
        "id": "1",
        "unread": true,
        "reason": reason,
        "subject": {
            "title": "fixture",
            "type": subject_type,
            "url": subject_url,
            "latest_comment_url": latest_comment_url,
        },
    })
}

/// Builds a pull request mention notification.
#[must_use]
pub fn mention_json(pull_request_url: &str, comment_url: &str) -> Value {
    notification_json("mention", "PullRequest", pull_request_url, Some(comment_url))
}

/// Builds a comment resource payload.
#[must_use]
pub fn comment_json(body: &str, login: &str) -> Value {
    json!({
        "id": 1,
        "body": body,
        "user": { "login": login },
    })
}
