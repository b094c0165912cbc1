//! A backend that logs instead of sending.
//!
//! Used when `SEND_TO_SLACK` is not `true`, so local and CI runs of a job don't
//! spam the team channel.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use slackline_core::Block;
use tracing::info;

use super::backend::MessageBackend;
use super::error::SlackError;
use super::types::MessageHandle;

/// Logs every message at `INFO` and pretends Slack accepted it.
#[derive(Debug)]
pub struct DryRunBackend {
    next_ts: AtomicU64,
}

impl DryRunBackend {
    /// Create a dry-run backend.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_ts: AtomicU64::new(1),
        }
    }

    fn handle(&self, channel: &str) -> MessageHandle {
        let n = self.next_ts.fetch_add(1, Ordering::Relaxed);
        MessageHandle::new(channel, format!("dry-run-{n}"))
    }
}

impl Default for DryRunBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn render_json(blocks: &[Block]) -> String {
    serde_json::to_string(blocks).unwrap_or_else(|e| format!("<unserializable blocks: {e}>"))
}

#[async_trait]
impl MessageBackend for DryRunBackend {
    async fn post_text(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        info!(channel, text, "Dry run: simple message");
        Ok(())
    }

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Result<(), SlackError> {
        info!(channel, user, text, "Dry run: secret message");
        Ok(())
    }

    async fn post_blocks(
        &self,
        channel: &str,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError> {
        let handle = self.handle(channel);
        info!(
            channel,
            ts = %handle.ts,
            fallback = ?fallback_text,
            blocks = %render_json(&blocks),
            "Dry run: block message"
        );
        Ok(handle)
    }

    async fn update_blocks(
        &self,
        handle: &MessageHandle,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError> {
        info!(
            channel = %handle.channel,
            ts = %handle.ts,
            fallback = ?fallback_text,
            blocks = %render_json(&blocks),
            "Dry run: block message update"
        );
        Ok(handle.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_post_blocks_returns_distinct_handles() {
        let backend = DryRunBackend::new();
        let first = backend.post_blocks("#ops", vec![], None).await.unwrap();
        let second = backend
            .post_blocks("#ops", vec![Block::Divider], Some("job"))
            .await
            .unwrap();
        assert_eq!(first.channel, "#ops");
        assert_eq!(first.ts, "dry-run-1");
        assert_eq!(second.ts, "dry-run-2");
    }

    #[tokio::test]
    async fn test_update_keeps_handle() {
        let backend = DryRunBackend::new();
        let handle = MessageHandle::new("#ops", "dry-run-7");
        let updated = backend
            .update_blocks(&handle, vec![Block::Divider], None)
            .await
            .unwrap();
        assert_eq!(updated, handle);
    }

    #[tokio::test]
    async fn test_text_and_ephemeral_succeed() {
        let backend = DryRunBackend::new();
        assert!(backend.post_text("#ops", "hello").await.is_ok());
        assert!(backend.post_ephemeral("#ops", "U1", "psst").await.is_ok());
    }
}
