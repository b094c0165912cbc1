//! Slack Block Kit types for building job status messages.
//!
//! These types represent the subset of the Slack Block Kit specification
//! needed to render message segments: headers, sections, context lines,
//! images and dividers.
//!
//! See: <https://api.slack.com/block-kit>

use serde::{Deserialize, Serialize};

/// Block Kit block types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Header block with large text.
    Header { text: PlainText },
    /// Section block with text and optional accessory.
    Section {
        text: Text,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
    /// Context block with small muted text/images.
    Context { elements: Vec<ContextElement> },
    /// Standalone image block.
    Image { image_url: String, alt_text: String },
    /// Divider block (horizontal line).
    Divider,
}

impl Block {
    /// A context block holding a single markdown line.
    #[must_use]
    pub fn context_mrkdwn(text: impl Into<String>) -> Self {
        Self::Context {
            elements: vec![ContextElement::mrkdwn(text)],
        }
    }
}

/// Text object types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    /// Markdown text (supports formatting).
    Mrkdwn { text: String },
}

impl Text {
    /// Create a markdown text object.
    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    /// The raw text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Mrkdwn { text } => text,
        }
    }
}

/// Plain text object (for headers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainText {
    #[serde(rename = "type")]
    pub text_type: String,
    pub text: String,
    pub emoji: bool,
}

impl PlainText {
    /// Create a new plain text object.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text_type: "plain_text".to_owned(),
            text: text.into(),
            emoji: true,
        }
    }
}

/// Context block elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContextElement {
    /// Markdown text in context.
    Mrkdwn { text: String },
}

impl ContextElement {
    /// Create a markdown context element.
    #[must_use]
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

/// Accessory elements for section blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    /// Thumbnail shown to the right of the section text.
    Image { image_url: String, alt_text: String },
}
