//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.mentionwatch.toml` in current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `MENTIONWATCH_DEPLOYMENT_TYPE`,
//!    `MENTIONWATCH_USER_TOKEN`, or legacy `GITHUB_USER_TOKEN`
//! 4. **Command-line arguments** – `--deployment-type`/`-d` and
//!    `--user-token`/`-t`
//!
//! # Configuration File
//!
//! ```toml
//! deployment_type = "user"
//! user_token = "ghp_example"
//! api_base = "https://api.github.com"
//! poll_interval_seconds = 5
//! agent_command = "pr-agent"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::dispatch::{CommandReviewAgent, DEFAULT_AGENT_COMMAND};
use crate::github::error::WatchError;
use crate::github::locator::{ApiBase, DEFAULT_API_BASE, PersonalAccessToken};

/// The only deployment type that can read a user's notifications.
pub const USER_DEPLOYMENT: &str = "user";

/// Environment variable consulted when no token is configured.
pub const LEGACY_TOKEN_ENV: &str = "GITHUB_USER_TOKEN";

const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 5;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use mentionwatch::MentionwatchConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = MentionwatchConfig::load().expect("failed to load configuration");
/// config.validate().expect("configuration should be usable");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "MENTIONWATCH",
    discovery(
        dotfile_name = ".mentionwatch.toml",
        config_file_name = "mentionwatch.toml",
        app_name = "mentionwatch"
    )
)]
pub struct MentionwatchConfig {
    /// Deployment type; polling requires `user`.
    ///
    /// Can be provided via:
    /// - CLI: `--deployment-type <TYPE>` or `-d <TYPE>`
    /// - Environment: `MENTIONWATCH_DEPLOYMENT_TYPE`
    /// - Config file: `deployment_type = "user"`
    #[ortho_config(cli_short = 'd')]
    pub deployment_type: Option<String>,

    /// Personal access token of the user whose notifications are polled.
    ///
    /// Can be provided via:
    /// - CLI: `--user-token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `MENTIONWATCH_USER_TOKEN` or `GITHUB_USER_TOKEN`
    ///   (legacy)
    /// - Config file: `user_token = "..."`
    #[ortho_config(cli_short = 't')]
    pub user_token: Option<String>,

    /// GitHub REST API base URL.
    ///
    /// Defaults to `https://api.github.com`; set it to
    /// `https://<host>/api/v3` for GitHub Enterprise.
    #[ortho_config()]
    pub api_base: String,

    /// Delay between poll cycles, in seconds.
    #[ortho_config()]
    pub poll_interval_seconds: u64,

    /// Executable run for every dispatched mention.
    ///
    /// Invoked as `<agent_command> <pull_request_url> <comment_body>`.
    #[ortho_config()]
    pub agent_command: String,

    /// Emits telemetry events as JSON lines on stderr.
    ///
    /// Can be provided via:
    /// - CLI: `--telemetry`
    /// - Config file: `telemetry = true`
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for MentionwatchConfig {
    fn default() -> Self {
        Self {
            deployment_type: None,
            user_token: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            agent_command: DEFAULT_AGENT_COMMAND.to_owned(),
            telemetry: false,
        }
    }
}

impl MentionwatchConfig {
    /// Checks every startup precondition.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidDeploymentType`] or
    /// [`WatchError::MissingToken`] when a precondition fails, and
    /// [`WatchError::Configuration`] or [`WatchError::InvalidUrl`] when the
    /// remaining settings are unusable.
    pub fn validate(&self) -> Result<(), WatchError> {
        self.require_user_deployment()?;
        self.resolve_token()?;
        self.api_base()?;

        if self.poll_interval_seconds == 0 {
            return Err(WatchError::Configuration {
                message: "poll_interval_seconds must be greater than zero".to_owned(),
            });
        }
        if self.agent_command.trim().is_empty() {
            return Err(WatchError::Configuration {
                message: "agent_command must not be empty".to_owned(),
            });
        }
        Ok(())
    }

    /// Ensures the deployment type is `user`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidDeploymentType`] when the deployment type
    /// is unset or anything other than `user`.
    pub fn require_user_deployment(&self) -> Result<(), WatchError> {
        match self.deployment_type.as_deref() {
            Some(USER_DEPLOYMENT) => Ok(()),
            other => Err(WatchError::InvalidDeploymentType {
                found: other.unwrap_or("none").to_owned(),
            }),
        }
    }

    /// Resolves the token from configuration or the legacy
    /// `GITHUB_USER_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, WatchError> {
        let token = self
            .user_token
            .clone()
            .filter(|token| !token.trim().is_empty())
            .or_else(|| env::var(LEGACY_TOKEN_ENV).ok())
            .ok_or(WatchError::MissingToken)?;
        PersonalAccessToken::new(token)
    }

    /// Parses the configured API base.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidUrl`] when `api_base` is not an HTTP(S)
    /// URL.
    pub fn api_base(&self) -> Result<ApiBase, WatchError> {
        ApiBase::parse(&self.api_base)
    }

    /// Delay between poll cycles.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// Builds the review agent described by `agent_command`.
    #[must_use]
    pub fn review_agent(&self) -> CommandReviewAgent {
        CommandReviewAgent::new(self.agent_command.trim())
    }
}

#[cfg(test)]
mod tests;
