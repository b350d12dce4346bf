//! Incremental fetch cursor for the notifications endpoint.
//!
//! Polling starts in timestamp mode, sending `since=<now>` so only newer
//! notifications are returned. Once GitHub answers with a `Last-Modified`
//! header the poller switches to conditional mode and sends that value as
//! `If-Modified-Since`; GitHub then tracks newer events itself and answers
//! `304 Not Modified` when nothing changed.

use chrono::{DateTime, SecondsFormat, Utc};

use super::gateway::NotificationFetch;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PollCursor {
    Since(String),
    IfModifiedSince(String),
}

/// The poller's incremental-fetch position.
///
/// Exactly one of [`since_timestamp`](Self::since_timestamp) and
/// [`conditional_token`](Self::conditional_token) is populated at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    cursor: PollCursor,
}

impl PollState {
    /// Starts in timestamp mode at the given instant.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use mentionwatch::github::PollState;
    ///
    /// let at = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
    /// let state = PollState::since(at);
    /// assert_eq!(state.since_timestamp(), Some("2026-10-17T09:30:00.000000Z"));
    /// assert_eq!(state.conditional_token(), None);
    /// ```
    #[must_use]
    pub fn since(at: DateTime<Utc>) -> Self {
        Self {
            cursor: PollCursor::Since(format_timestamp(at)),
        }
    }

    /// Starts in timestamp mode at the current UTC time.
    #[must_use]
    pub fn starting_now() -> Self {
        Self::since(Utc::now())
    }

    /// The `since` timestamp, when in timestamp mode.
    #[must_use]
    pub fn since_timestamp(&self) -> Option<&str> {
        match &self.cursor {
            PollCursor::Since(timestamp) => Some(timestamp.as_str()),
            PollCursor::IfModifiedSince(_) => None,
        }
    }

    /// The `If-Modified-Since` value, when in conditional mode.
    #[must_use]
    pub fn conditional_token(&self) -> Option<&str> {
        match &self.cursor {
            PollCursor::Since(_) => None,
            PollCursor::IfModifiedSince(token) => Some(token.as_str()),
        }
    }

    /// Returns true once a `Last-Modified` value has been adopted.
    #[must_use]
    pub const fn is_conditional(&self) -> bool {
        matches!(self.cursor, PollCursor::IfModifiedSince(_))
    }

    /// Adopts the freshness token from a successful fetch.
    ///
    /// Only a `200` carrying a `Last-Modified` value changes the state; it
    /// switches to conditional mode and drops the timestamp. `304` responses
    /// and responses without the header leave the cursor untouched. Returns
    /// true when the cursor changed.
    pub fn apply(&mut self, fetch: &NotificationFetch) -> bool {
        let NotificationFetch::Modified {
            last_modified: Some(token),
            ..
        } = fetch
        else {
            return false;
        };

        let trimmed = token.trim();
        if trimmed.is_empty() || self.conditional_token() == Some(trimmed) {
            return false;
        }

        tracing::debug!(last_modified = trimmed, "adopting conditional notifications cursor");
        self.cursor = PollCursor::IfModifiedSince(trimmed.to_owned());
        true
    }
}

impl Default for PollState {
    fn default() -> Self {
        Self::starting_now()
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
