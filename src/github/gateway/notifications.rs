//! Octocrab implementation of the notification gateway.

use async_trait::async_trait;
use http::header::LAST_MODIFIED;
use http::{HeaderMap, StatusCode, Uri};
use octocrab::Octocrab;

use crate::github::error::WatchError;
use crate::github::locator::{ApiBase, PersonalAccessToken};
use crate::github::models::{Comment, parse_comment, parse_notifications};
use crate::github::poll_state::PollState;
use crate::github::rate_limit::RateLimitInfo;

use super::client::build_octocrab_client;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::{
    base_headers, extract_github_message, header_to_string, notification_headers,
    notifications_uri,
};
use super::{NotificationFetch, NotificationGateway};

/// Raw response pieces kept after the body has been read.
struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

/// Octocrab-backed notification gateway.
pub struct OctocrabNotificationGateway {
    client: Octocrab,
    api_base: ApiBase,
}

impl OctocrabNotificationGateway {
    /// Creates a new gateway from an authenticated Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, api_base: ApiBase) -> Self {
        Self { client, api_base }
    }

    /// Builds a gateway that authenticates with the given token.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidUrl` when the base URI cannot be parsed or
    /// `WatchError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: ApiBase) -> Result<Self, WatchError> {
        let octocrab = build_octocrab_client(token, &api_base)?;
        Ok(Self::new(octocrab, api_base))
    }

    async fn get(
        &self,
        operation: &str,
        uri: Uri,
        headers: HeaderMap,
    ) -> Result<RawResponse, WatchError> {
        let response = self
            .client
            ._get_with_headers(uri, Some(headers))
            .await
            .map_err(|error| map_octocrab_error(operation, &error))?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| WatchError::Api {
                message: format!("{operation} response decode failed: {error}"),
            })?;

        Ok(RawResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

fn unexpected_status(operation: &str, response: &RawResponse) -> WatchError {
    map_http_error(
        operation,
        response.status,
        extract_github_message(&response.body),
        RateLimitInfo::from_headers(&response.headers),
    )
}

#[async_trait]
impl NotificationGateway for OctocrabNotificationGateway {
    async fn notifications(&self, state: &PollState) -> Result<NotificationFetch, WatchError> {
        let uri = notifications_uri(&self.api_base, state)?;
        tracing::debug!(%uri, "fetching notifications");
        let response = self
            .get("notifications", uri, notification_headers(state))
            .await?;

        match response.status {
            StatusCode::NOT_MODIFIED => Ok(NotificationFetch::NotModified),
            StatusCode::OK => {
                let notifications =
                    parse_notifications(&response.body).map_err(|error| WatchError::Api {
                        message: format!("notifications response deserialisation failed: {error}"),
                    })?;

                Ok(NotificationFetch::Modified {
                    notifications,
                    last_modified: header_to_string(response.headers.get(LAST_MODIFIED)),
                })
            }
            _ => Err(unexpected_status("notifications", &response)),
        }
    }

    async fn comment(&self, comment_url: &str) -> Result<Comment, WatchError> {
        let uri = comment_url
            .parse::<Uri>()
            .map_err(|error| WatchError::InvalidUrl(format!("{comment_url}: {error}")))?;
        let response = self.get("comment", uri, base_headers()).await?;

        if response.status != StatusCode::OK {
            return Err(unexpected_status("comment", &response));
        }

        parse_comment(&response.body).map_err(|error| WatchError::Api {
            message: format!("comment response deserialisation failed: {error}"),
        })
    }
}
