//! Slack-related errors.

use thiserror::Error;

/// Errors that can occur when interacting with Slack.
#[derive(Debug, Error)]
pub enum SlackError {
    /// HTTP request failed.
    #[error("Slack request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("Slack response error: {0}")]
    Response(String),

    /// Slack API returned an error.
    #[error("Slack API error: {0}")]
    Api(String),

    /// Rate limited by Slack. Not retried; the caller decides.
    #[error("Slack rate limited, retry after {retry_after} seconds")]
    RateLimited {
        /// Seconds Slack asked us to wait.
        retry_after: u64,
    },
}
