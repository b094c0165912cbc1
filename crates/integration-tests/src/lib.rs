//! Integration tests for Slackline.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p slackline-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `messenger_scenarios` - messenger behavior against a recording backend
//! - `slack_api` - the Web API client against a mock HTTP server
//!
//! Neither category talks to the real Slack API.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use slackline::{MessageBackend, MessageHandle, SlackError};
use slackline_core::{Block, SlackConfig};

/// Timestamp prefix of handles returned by [`RecordingBackend`].
pub const HANDLE_TS_PREFIX: &str = "1700000000.";

/// One outbound call seen by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PostText {
        channel: String,
        text: String,
    },
    PostEphemeral {
        channel: String,
        user: String,
        text: String,
    },
    PostBlocks {
        channel: String,
        blocks: Vec<Block>,
        fallback_text: Option<String>,
    },
    UpdateBlocks {
        handle: MessageHandle,
        blocks: Vec<Block>,
        fallback_text: Option<String>,
    },
}

/// Backend that records every call and answers like Slack would.
///
/// Clones share the same call log, so a test can keep one clone while the
/// messenger owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    calls: Arc<Mutex<Vec<Call>>>,
    failing_users: Arc<Mutex<Vec<String>>>,
}

impl RecordingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make ephemeral messages to `user` fail with `user_not_in_channel`.
    #[must_use]
    pub fn fail_ephemeral_to(self, user: &str) -> Self {
        self.failing_users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(user.to_owned());
        self
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.push(call);
        calls.len()
    }
}

#[async_trait]
impl MessageBackend for RecordingBackend {
    async fn post_text(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        self.record(Call::PostText {
            channel: channel.to_owned(),
            text: text.to_owned(),
        });
        Ok(())
    }

    async fn post_ephemeral(
        &self,
        channel: &str,
        user: &str,
        text: &str,
    ) -> Result<(), SlackError> {
        self.record(Call::PostEphemeral {
            channel: channel.to_owned(),
            user: user.to_owned(),
            text: text.to_owned(),
        });

        let failing = self
            .failing_users
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|u| u == user);
        if failing {
            return Err(SlackError::Api("user_not_in_channel".to_string()));
        }
        Ok(())
    }

    async fn post_blocks(
        &self,
        channel: &str,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError> {
        let n = self.record(Call::PostBlocks {
            channel: channel.to_owned(),
            blocks,
            fallback_text: fallback_text.map(str::to_owned),
        });
        Ok(MessageHandle::new(
            channel,
            format!("{HANDLE_TS_PREFIX}{n:06}"),
        ))
    }

    async fn update_blocks(
        &self,
        handle: &MessageHandle,
        blocks: Vec<Block>,
        fallback_text: Option<&str>,
    ) -> Result<MessageHandle, SlackError> {
        self.record(Call::UpdateBlocks {
            handle: handle.clone(),
            blocks,
            fallback_text: fallback_text.map(str::to_owned),
        });
        Ok(handle.clone())
    }
}

/// Config with token `tok-1` and the given default recipients.
///
/// # Panics
///
/// Panics if a recipient is not a valid member ID.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_config(recipient_1: Option<&str>, recipient_2: Option<&str>) -> SlackConfig {
    SlackConfig::new("tok-1", recipient_1, recipient_2).expect("test config is valid")
}
