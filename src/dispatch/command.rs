//! Review agent backed by an external command.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::github::error::WatchError;

use super::{AgentOutcome, ReviewAgent};

/// Default executable invoked for each dispatched mention.
pub const DEFAULT_AGENT_COMMAND: &str = "pr-agent";

/// Runs `<program> [args...] <pull_request_url> <comment_body>` for every
/// request and waits for it to exit.
///
/// The child inherits stdout and stderr so the agent's own output lands in
/// the poller's log stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReviewAgent {
    program: String,
    args: Vec<String>,
}

impl Default for CommandReviewAgent {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT_COMMAND)
    }
}

impl CommandReviewAgent {
    /// Creates an agent running the given program with no leading arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds arguments placed before the pull request URL and comment body.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program this agent runs.
    #[must_use]
    pub const fn program(&self) -> &str {
        self.program.as_str()
    }

    fn command(&self, pull_request_url: &str, comment_body: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(pull_request_url)
            .arg(comment_body)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl ReviewAgent for CommandReviewAgent {
    async fn handle_request(
        &self,
        pull_request_url: &str,
        comment_body: &str,
    ) -> Result<AgentOutcome, WatchError> {
        let status = self
            .command(pull_request_url, comment_body)
            .status()
            .await
            .map_err(|error| WatchError::Agent {
                message: format!("failed to run '{}': {error}", self.program),
            })?;

        Ok(AgentOutcome {
            succeeded: status.success(),
            exit_code: status.code(),
        })
    }
}
