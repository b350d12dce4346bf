//! API endpoint and credential wrappers for notification polling.

use url::Url;

use super::error::WatchError;

/// Public GitHub REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, WatchError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(WatchError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(..)")
    }
}

/// Parsed GitHub API base URL.
///
/// `https://api.github.com` for github.com, or `https://<host>/api/v3` for
/// GitHub Enterprise installations.
///
/// ```
/// use mentionwatch::github::ApiBase;
///
/// let base = ApiBase::parse("https://ghe.example.com/api/v3/")
///     .expect("should parse enterprise base");
/// assert_eq!(
///     base.notifications_url().as_str(),
///     "https://ghe.example.com/api/v3/notifications"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Parses an absolute HTTP(S) API base URL.
    ///
    /// # Errors
    ///
    /// Returns `WatchError::InvalidUrl` when the input does not parse or is
    /// not an HTTP(S) URL with a host.
    pub fn parse(input: &str) -> Result<Self, WatchError> {
        let parsed =
            Url::parse(input.trim()).map_err(|error| WatchError::InvalidUrl(error.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WatchError::InvalidUrl(format!(
                "API base must use http or https: {input}"
            )));
        }
        if parsed.host_str().is_none() {
            return Err(WatchError::InvalidUrl(
                "API base must include a host".to_owned(),
            ));
        }

        Ok(Self(parsed))
    }

    /// The base URL as a string, suitable for the Octocrab client builder.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Absolute URL of the notifications endpoint under this base, without
    /// a query string.
    #[must_use]
    pub fn notifications_url(&self) -> Url {
        let mut url = self.0.clone();
        let path = format!("{}/notifications", self.0.path().trim_end_matches('/'));
        url.set_path(&path);
        url.set_query(None);
        url
    }
}
