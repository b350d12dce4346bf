//! Error types exposed by the notification polling layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while configuring the poller or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WatchError {
    /// The deployment type is not `user`, so notifications cannot be read.
    #[error("deployment type must be 'user' to read notifications (found '{found}')")]
    InvalidDeploymentType {
        /// The configured deployment type, or `none` when unset.
        found: String,
    },

    /// The user token was missing or blank.
    #[error("user token must be set to read notifications")]
    MissingToken,

    /// A URL could not be parsed.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Rate limit exceeded - the API returned 403 or 429 with a rate limit
    /// message.
    #[error("GitHub API rate limit exceeded: {message}{}", quota_hint(.rate_limit.as_ref()))]
    RateLimitExceeded {
        /// Rate limit info if available from response headers.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// The review agent could not be invoked.
    #[error("review agent failed: {message}")]
    Agent {
        /// Details about the agent failure.
        message: String,
    },
}

impl WatchError {
    /// Rate limit headers captured with a rate limit failure.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<&RateLimitInfo> {
        match self {
            Self::RateLimitExceeded {
                rate_limit: Some(info),
                ..
            } => Some(info),
            _ => None,
        }
    }
}

fn quota_hint(rate_limit: Option<&RateLimitInfo>) -> String {
    rate_limit.map_or_else(String::new, |info| {
        format!(
            " ({} of {} requests left; resets at unix time {})",
            info.remaining(),
            info.limit(),
            info.reset_at()
        )
    })
}
