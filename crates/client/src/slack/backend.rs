//! The outbound seam between a messenger and Slack.

use async_trait::async_trait;
use slackline_core::Block;

use super::client::SlackClient;
use super::error::SlackError;
use super::types::MessageHandle;

/// Something that can deliver messages to a Slack channel.
///
/// [`SlackClient`] talks to the real Web API; [`super::DryRunBackend`] only
/// logs. Each method is a single outbound call and is never retried.
#[async_trait]
pub trait MessageBackend: Send + Sync {
    /// Post an unformatted text message.
    async fn post_text(&self, channel: &str, text: &str) -> Result<(), SlackError>;

    /// Post a message visible only to `user`.
    async fn post_ephemeral(&self, channel: &str, user: &str, text: &str)
    -> Result<(), SlackError>;

    /// Post a block message and return where it landed.
    async fn post_blocks(
        &self,
        channel: &str,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError>;

    /// Replace the blocks of a previously posted message.
    async fn update_blocks(
        &self,
        handle: &MessageHandle,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError>;
}

#[async_trait]
impl MessageBackend for SlackClient {
    async fn post_text(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        Self::post_text(self, channel, text).await.map(|_| ())
    }

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Result<(), SlackError> {
        Self::post_ephemeral(self, channel, user, text)
            .await
            .map(|_| ())
    }

    async fn post_blocks(
        &self,
        channel: &str,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError> {
        self.post_message(channel, blocks, fallback_text)
            .await?
            .handle()
    }

    async fn update_blocks(
        &self,
        handle: &MessageHandle,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError> {
        let response = self
            .update_message(&handle.channel, &handle.ts, blocks, fallback_text)
            .await?;

        // chat.update echoes the channel and ts; fall back to what we sent.
        Ok(MessageHandle {
            channel: response.channel.unwrap_or_else(|| handle.channel.clone()),
            ts: response.ts.unwrap_or_else(|| handle.ts.clone()),
        })
    }
}

#[async_trait]
impl<B: MessageBackend + ?Sized> MessageBackend for Box<B> {
    async fn post_text(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        (**self).post_text(channel, text).await
    }

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Result<(), SlackError> {
        (**self).post_ephemeral(channel, user, text).await
    }

    async fn post_blocks(
        &self,
        channel: &str,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError> {
        (**self).post_blocks(channel, blocks, fallback_text).await
    }

    async fn update_blocks(
        &self,
        handle: &MessageHandle,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError> {
        (**self).update_blocks(handle, blocks, fallback_text).await
    }
}
