//! Web API request and response bodies.
//!
//! Block payloads themselves live in [`slackline_core::blocks`].

use serde::{Deserialize, Serialize};
use slackline_core::Block;

use super::error::SlackError;

/// A Slack message with blocks (`chat.postMessage`).
#[derive(Debug, Clone, Serialize)]
pub struct SlackMessage {
    /// Channel ID or `#name` to post to.
    pub channel: String,
    /// Message blocks.
    pub blocks: Vec<Block>,
    /// Optional plain text fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A plain text message (`chat.postMessage` without blocks).
#[derive(Debug, Clone, Serialize)]
pub struct TextMessage {
    pub channel: String,
    pub text: String,
}

/// A message only `user` can see (`chat.postEphemeral`).
#[derive(Debug, Clone, Serialize)]
pub struct EphemeralMessage {
    pub channel: String,
    pub user: String,
    pub text: String,
}

/// Replacement content for an existing message (`chat.update`).
#[derive(Debug, Clone, Serialize)]
pub struct UpdateMessage {
    /// Channel ID the message lives in (as returned by the post).
    pub channel: String,
    /// Timestamp of the message to replace.
    pub ts: String,
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Minimal envelope every Web API method returns.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// Whether the request was successful.
    pub ok: bool,
    /// Error code if not ok.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from posting a message.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    /// Whether the request was successful.
    pub ok: bool,
    /// Channel ID where message was posted.
    #[serde(default)]
    pub channel: Option<String>,
    /// Message timestamp (unique ID).
    #[serde(default)]
    pub ts: Option<String>,
    /// Error message if not ok.
    #[serde(default)]
    pub error: Option<String>,
}

impl PostMessageResponse {
    /// Where the posted message can be updated.
    ///
    /// # Errors
    ///
    /// Returns [`SlackError::Response`] if Slack reported success but omitted
    /// the channel or timestamp.
    pub fn handle(&self) -> Result<MessageHandle, SlackError> {
        match (self.channel.as_deref(), self.ts.as_deref()) {
            (Some(channel), Some(ts)) if !channel.is_empty() && !ts.is_empty() => {
                Ok(MessageHandle::new(channel, ts))
            }
            _ => Err(SlackError::Response(
                "chat.postMessage response is missing channel or ts".to_string(),
            )),
        }
    }
}

/// Response from updating a message.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMessageResponse {
    /// Whether the request was successful.
    pub ok: bool,
    /// Channel ID.
    #[serde(default)]
    pub channel: Option<String>,
    /// Updated message timestamp.
    #[serde(default)]
    pub ts: Option<String>,
    /// Error message if not ok.
    #[serde(default)]
    pub error: Option<String>,
}

/// Identifies a posted message so it can be updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHandle {
    /// Channel ID Slack reported for the message.
    pub channel: String,
    /// Message timestamp.
    pub ts: String,
}

impl MessageHandle {
    /// Create a handle from a channel and timestamp.
    #[must_use]
    pub fn new(channel: impl Into<String>, ts: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            ts: ts.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_response_handle() {
        let response: PostMessageResponse = serde_json::from_value(json!({
            "ok": true,
            "channel": "C0123ABCD",
            "ts": "1712345678.000100",
            "message": {"text": "ignored"}
        }))
        .unwrap();
        assert_eq!(
            response.handle().unwrap(),
            MessageHandle::new("C0123ABCD", "1712345678.000100")
        );
    }

    #[test]
    fn test_post_response_without_ts() {
        let response: PostMessageResponse =
            serde_json::from_value(json!({"ok": true, "channel": "C0123ABCD"})).unwrap();
        assert!(matches!(response.handle(), Err(SlackError::Response(_))));
    }

    #[test]
    fn test_error_response_parses() {
        let response: ApiResponse =
            serde_json::from_value(json!({"ok": false, "error": "channel_not_found"})).unwrap();
        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("channel_not_found"));
    }

    #[test]
    fn test_message_omits_missing_text() {
        let message = SlackMessage {
            channel: "#ops".to_string(),
            blocks: vec![Block::Divider],
            text: None,
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"channel": "#ops", "blocks": [{"type": "divider"}]})
        );
    }
}
