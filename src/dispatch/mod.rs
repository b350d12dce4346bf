//! Hand-off of resolved mentions to the external review agent.
//!
//! A mention is dispatched only when its comment addresses someone directly,
//! i.e. the trimmed body starts with `@`. The agent receives the pull request
//! API URL and the raw, untrimmed comment body. Whatever the agent reports is
//! logged and otherwise ignored: dispatch results never influence the poll
//! cursor and failed dispatches are not retried.

mod command;

pub use command::{CommandReviewAgent, DEFAULT_AGENT_COMMAND};

use std::sync::Arc;

use async_trait::async_trait;

use crate::github::error::WatchError;
use crate::github::mention::PullRequestMention;
use crate::github::models::Comment;

/// Result reported by a review agent for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentOutcome {
    /// Whether the agent reported success.
    pub succeeded: bool,
    /// Process exit code, when the agent is an external process.
    pub exit_code: Option<i32>,
}

impl AgentOutcome {
    /// Outcome for an agent that completed successfully.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            succeeded: true,
            exit_code: Some(0),
        }
    }
}

/// Single entry point of the external automated-review agent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewAgent: Send + Sync {
    /// Handle a request made in a pull request comment.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Agent`] when the agent could not be invoked.
    async fn handle_request(
        &self,
        pull_request_url: &str,
        comment_body: &str,
    ) -> Result<AgentOutcome, WatchError>;
}

#[async_trait]
impl<Agent> ReviewAgent for Arc<Agent>
where
    Agent: ReviewAgent + ?Sized,
{
    async fn handle_request(
        &self,
        pull_request_url: &str,
        comment_body: &str,
    ) -> Result<AgentOutcome, WatchError> {
        (**self).handle_request(pull_request_url, comment_body).await
    }
}

/// The unit handed to the review agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// API URL of the pull request.
    pub pull_request_url: String,
    /// Comment body exactly as GitHub returned it.
    pub comment_text: String,
}

impl DispatchRequest {
    /// Builds a request when the comment is directed at someone.
    ///
    /// ```
    /// use mentionwatch::dispatch::DispatchRequest;
    /// use mentionwatch::github::{Comment, PullRequestMention};
    ///
    /// let mention = PullRequestMention {
    ///     pull_request_url: "https://api.github.com/repos/o/r/pulls/1".to_owned(),
    ///     comment_url: None,
    /// };
    /// let comment = Comment {
    ///     body: "looks good".to_owned(),
    ///     author_login: "octocat".to_owned(),
    /// };
    /// assert_eq!(DispatchRequest::for_comment(&mention, &comment), None);
    /// ```
    #[must_use]
    pub fn for_comment(mention: &PullRequestMention, comment: &Comment) -> Option<Self> {
        comment.is_directed().then(|| Self {
            pull_request_url: mention.pull_request_url.clone(),
            comment_text: comment.body.clone(),
        })
    }
}

/// Forwards qualifying mentions to a [`ReviewAgent`].
#[derive(Debug)]
pub struct Dispatcher<Agent> {
    agent: Agent,
}

impl<Agent> Dispatcher<Agent>
where
    Agent: ReviewAgent,
{
    /// Creates a dispatcher around the given agent.
    #[must_use]
    pub const fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Dispatches the comment when it is directed at someone, awaiting the
    /// agent before returning.
    ///
    /// Returns the request that was handed over, or `None` when the comment
    /// did not qualify.
    pub async fn dispatch(
        &self,
        mention: &PullRequestMention,
        comment: &Comment,
    ) -> Option<DispatchRequest> {
        let Some(request) = DispatchRequest::for_comment(mention, comment) else {
            tracing::debug!(
                pull_request = mention.pull_request_url.as_str(),
                "comment is not directed at anyone; skipping dispatch"
            );
            return None;
        };

        tracing::info!(
            pull_request = request.pull_request_url.as_str(),
            commenter = comment.author_login.as_str(),
            "dispatching mention to review agent"
        );

        match self
            .agent
            .handle_request(&request.pull_request_url, &request.comment_text)
            .await
        {
            Ok(outcome) if outcome.succeeded => {
                tracing::info!(
                    pull_request = request.pull_request_url.as_str(),
                    "review agent handled request"
                );
            }
            Ok(outcome) => {
                tracing::warn!(
                    pull_request = request.pull_request_url.as_str(),
                    exit_code = ?outcome.exit_code,
                    "review agent reported failure"
                );
            }
            Err(error) => {
                tracing::warn!(
                    pull_request = request.pull_request_url.as_str(),
                    %error,
                    "review agent could not be invoked"
                );
            }
        }

        Some(request)
    }
}
