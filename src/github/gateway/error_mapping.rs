//! Error mapping helpers for the Octocrab notification gateway.

use http::StatusCode;

use crate::github::error::WatchError;
use crate::github::rate_limit::RateLimitInfo;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a failed response is a rate limit rejection based on the
/// HTTP status and message content.
pub(super) fn is_rate_limit_error(status: StatusCode, message: &str) -> bool {
    matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && message.to_lowercase().contains("rate limit")
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> WatchError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(
            operation,
            source.status_code,
            Some(source.message.clone()),
            None,
        );
    }

    if is_network_error(error) {
        return WatchError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    WatchError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
    rate_limit: Option<RateLimitInfo>,
) -> WatchError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_rate_limit_error(status, &message) {
        WatchError::RateLimitExceeded {
            rate_limit,
            message: format!("{operation} failed: {message}"),
        }
    } else if is_auth_failure(status) {
        WatchError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else {
        WatchError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}
