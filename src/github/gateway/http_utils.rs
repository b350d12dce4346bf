//! Shared HTTP utilities for the notification gateway.

use http::Uri;
use http::header::{ACCEPT, HeaderMap, HeaderValue, IF_MODIFIED_SINCE};

use crate::github::error::WatchError;
use crate::github::locator::ApiBase;
use crate::github::poll_state::PollState;

/// Media type requested from the REST API.
pub(super) const GITHUB_V3_JSON: &str = "application/vnd.github.v3+json";

/// Headers sent with every request: the v3 JSON media type.
pub(super) fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_V3_JSON));
    headers
}

/// Base headers plus `If-Modified-Since` when the cursor is in conditional
/// mode.
///
/// A token that is not a valid header value is dropped with a warning; the
/// request then behaves like an unconditional fetch.
pub(super) fn notification_headers(state: &PollState) -> HeaderMap {
    let mut headers = base_headers();

    if let Some(token) = state.conditional_token() {
        match HeaderValue::from_str(token) {
            Ok(value) => {
                headers.insert(IF_MODIFIED_SINCE, value);
            }
            Err(error) => {
                tracing::warn!(token, %error, "ignoring unusable If-Modified-Since value");
            }
        }
    }

    headers
}

/// Builds `<api_base>/notifications?participating=true[&since=<timestamp>]`.
pub(super) fn notifications_uri(api_base: &ApiBase, state: &PollState) -> Result<Uri, WatchError> {
    let mut url = api_base.notifications_url();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("participating", "true");
        if let Some(since) = state.since_timestamp() {
            query.append_pair("since", since);
        }
    }

    url.as_str()
        .parse::<Uri>()
        .map_err(|error| WatchError::InvalidUrl(error.to_string()))
}

pub(super) fn header_to_string(header_value: Option<&HeaderValue>) -> Option<String> {
    header_value
        .and_then(|raw| raw.to_str().ok())
        .map(ToOwned::to_owned)
}

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
