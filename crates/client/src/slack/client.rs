//! Slack Web API client.
//!
//! Provides methods for posting, updating and sending ephemeral messages.

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use slackline_core::Block;
use tracing::{debug, error, instrument};

use super::error::SlackError;
use super::types::{
    ApiResponse, EphemeralMessage, PostMessageResponse, SlackMessage, TextMessage, UpdateMessage,
    UpdateMessageResponse,
};

/// Slack Web API base URL.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Used when a 429 arrives without a usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Slack API client for sending and updating messages.
#[derive(Clone)]
pub struct SlackClient {
    /// HTTP client.
    client: Client,
    /// Bot token for authentication.
    bot_token: SecretString,
    /// API base URL, without a trailing slash.
    base_url: String,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("bot_token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Create a new Slack client.
    #[must_use]
    pub fn new(bot_token: SecretString) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            base_url: SLACK_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API base (proxies, tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post a block message to a channel.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or Slack returns an error.
    #[instrument(skip(self, blocks, fallback_text), fields(channel = %channel, blocks = blocks.len()))]
    pub async fn post_message(
        &self,
        channel: &str,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<PostMessageResponse, SlackError> {
        let message = SlackMessage {
            channel: channel.to_string(),
            blocks,
            text: fallback_text.map(String::from),
        };

        let result: PostMessageResponse = self.call("chat.postMessage", &message).await?;
        check_ok(result.ok, result.error.clone(), "posting message")?;

        debug!(
            ts = ?result.ts,
            channel = ?result.channel,
            "Message posted to Slack"
        );

        Ok(result)
    }

    /// Update an existing message.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or Slack returns an error.
    #[instrument(skip(self, blocks, fallback_text), fields(channel = %channel, ts = %ts))]
    pub async fn update_message(
        &self,
        channel: &str,
        ts: &str,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<UpdateMessageResponse, SlackError> {
        let message = UpdateMessage {
            channel: channel.to_string(),
            ts: ts.to_string(),
            blocks,
            text: fallback_text.map(String::from),
        };

        let result: UpdateMessageResponse = self.call("chat.update", &message).await?;
        check_ok(result.ok, result.error.clone(), "updating message")?;

        debug!(ts = %ts, "Message updated in Slack");

        Ok(result)
    }

    /// Post an unformatted text message.
    ///
    /// # Errors
    ///
    /// Returns error if posting fails.
    #[instrument(skip(self, text), fields(channel = %channel))]
    pub async fn post_text(
        &self,
        channel: &str,
        text: &str,
    ) -> Result<PostMessageResponse, SlackError> {
        let message = TextMessage {
            channel: channel.to_string(),
            text: text.to_string(),
        };

        let result: PostMessageResponse = self.call("chat.postMessage", &message).await?;
        check_ok(result.ok, result.error.clone(), "posting text message")?;

        debug!(ts = ?result.ts, "Text message posted to Slack");

        Ok(result)
    }

    /// Post a message in a channel that only `user` can see.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or Slack returns an error
    /// (e.g. `user_not_in_channel`).
    #[instrument(skip(self, text), fields(channel = %channel, user = %user))]
    pub async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Result<ApiResponse, SlackError> {
        let message = EphemeralMessage {
            channel: channel.to_string(),
            user: user.to_string(),
            text: text.to_string(),
        };

        let result: ApiResponse = self.call("chat.postEphemeral", &message).await?;
        check_ok(result.ok, result.error.clone(), "posting ephemeral message")?;

        debug!("Ephemeral message posted to Slack");

        Ok(result)
    }

    /// POST a JSON body to a Web API method and decode the reply.
    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, SlackError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .bearer_auth(self.bot_token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(|e| SlackError::Request(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            error!(method, retry_after, "Slack rate limit hit");
            return Err(SlackError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Response(format!(
                "{method} returned {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SlackError::Response(e.to_string()))
    }
}

/// Turn an `ok: false` envelope into [`SlackError::Api`].
fn check_ok(ok: bool, error: Option<String>, action: &str) -> Result<(), SlackError> {
    if ok {
        return Ok(());
    }

    error!(error = ?error, "Slack API error {action}");
    Err(SlackError::Api(
        error.unwrap_or_else(|| "Unknown error".to_string()),
    ))
}
