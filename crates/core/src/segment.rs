//! Message segments and their rendering into Block Kit blocks.
//!
//! A job status message is an ordered list of [`Segment`]s. Insertion order is
//! rendering order: [`render`] turns the list into the blocks sent to Slack on
//! every post and update.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::blocks::{Accessory, Block, ContextElement, PlainText, Text};

/// Slack rejects header text longer than this.
const HEADER_MAX_CHARS: usize = 150;

/// Slack rejects section text longer than this.
const SECTION_MAX_CHARS: usize = 3000;

/// Slack rejects a context text element longer than this.
const CONTEXT_MAX_CHARS: usize = 3000;

const SUCCESS_TEXT: &str = " *Job Successful* !! :tada: ";
const FAILURE_TEXT: &str = " *Job Unsuccessful* :disappointed_relieved: ";

/// Shown in an error segment when the caller gave no message.
pub const DEFAULT_ERROR_MESSAGE: &str = "No error details were provided.";

/// An image reference with its accessibility text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    pub alt_text: String,
}

impl ImageRef {
    /// Create an image reference.
    #[must_use]
    pub fn new(url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt_text: alt_text.into(),
        }
    }
}

/// What a segment shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Large job title plus the time the job started.
    Header {
        label: String,
        started_at: DateTime<Tz>,
    },
    /// A paragraph, optionally with an image beside it.
    Text {
        text: String,
        image: Option<ImageRef>,
        mentions: Option<String>,
    },
    /// A standalone image.
    Image(ImageRef),
    /// A horizontal rule.
    Divider,
    /// A small annotation line.
    Context { text: String },
    /// Fixed "job succeeded" decoration.
    Success { mentions: Option<String> },
    /// Fixed "job failed" decoration with the error message.
    Error {
        message: Option<String>,
        mentions: Option<String>,
    },
}

/// One entry in a job status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Transient status line, superseded by the next message block.
    pub temporary: bool,
}

impl Segment {
    const fn permanent(kind: SegmentKind) -> Self {
        Self {
            kind,
            temporary: false,
        }
    }

    /// Header segment for a job.
    #[must_use]
    pub fn header(label: impl Into<String>, started_at: DateTime<Tz>) -> Self {
        Self::permanent(SegmentKind::Header {
            label: label.into(),
            started_at,
        })
    }

    /// Plain paragraph segment.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::permanent(SegmentKind::Text {
            text: text.into(),
            image: None,
            mentions: None,
        })
    }

    /// Standalone image segment.
    #[must_use]
    pub const fn image(image: ImageRef) -> Self {
        Self::permanent(SegmentKind::Image(image))
    }

    /// Divider segment.
    #[must_use]
    pub const fn divider() -> Self {
        Self::permanent(SegmentKind::Divider)
    }

    /// Small annotation segment.
    #[must_use]
    pub fn context(text: impl Into<String>) -> Self {
        Self::permanent(SegmentKind::Context { text: text.into() })
    }

    /// Success decoration.
    #[must_use]
    pub const fn success(mentions: Option<String>) -> Self {
        Self::permanent(SegmentKind::Success { mentions })
    }

    /// Error decoration.
    #[must_use]
    pub const fn error(message: Option<String>, mentions: Option<String>) -> Self {
        Self::permanent(SegmentKind::Error { message, mentions })
    }

    /// Render this segment into one or more blocks.
    #[must_use]
    pub fn to_blocks(&self) -> Vec<Block> {
        match &self.kind {
            SegmentKind::Header { label, started_at } => vec![
                Block::Header {
                    text: PlainText::new(truncate(label, HEADER_MAX_CHARS)),
                },
                Block::context_mrkdwn(truncate(
                    &format!(
                        "Invoking *{label}* :on: \nDate: {} \tTime: {}",
                        started_at.format("%Y-%m-%d"),
                        started_at.format("%H:%M:%S"),
                    ),
                    CONTEXT_MAX_CHARS,
                )),
                Block::Divider,
            ],
            SegmentKind::Text {
                text,
                image,
                mentions,
            } => {
                let body = match mentions {
                    Some(m) => format!("{text}\n{m}"),
                    None => text.clone(),
                };
                vec![Block::Section {
                    text: Text::mrkdwn(truncate(&body, SECTION_MAX_CHARS)),
                    accessory: image.as_ref().map(|i| Accessory::Image {
                        image_url: i.url.clone(),
                        alt_text: i.alt_text.clone(),
                    }),
                }]
            }
            SegmentKind::Image(image) => vec![Block::Image {
                image_url: image.url.clone(),
                alt_text: image.alt_text.clone(),
            }],
            SegmentKind::Divider => vec![Block::Divider],
            SegmentKind::Context { text } => {
                vec![Block::context_mrkdwn(truncate(text, CONTEXT_MAX_CHARS))]
            }
            SegmentKind::Success { mentions } => {
                let mut elements = vec![ContextElement::mrkdwn(SUCCESS_TEXT)];
                push_mentions(&mut elements, mentions.as_deref());
                vec![Block::Context { elements }]
            }
            SegmentKind::Error { message, mentions } => {
                let message = message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE);
                let mut elements = vec![
                    ContextElement::mrkdwn(FAILURE_TEXT),
                    ContextElement::mrkdwn(truncate(
                        &format!(" *Error Message* : {message} \n"),
                        CONTEXT_MAX_CHARS,
                    )),
                ];
                push_mentions(&mut elements, mentions.as_deref());
                vec![Block::Context { elements }]
            }
        }
    }
}

/// Render segments into the block list sent to Slack, preserving order.
#[must_use]
pub fn render(segments: &[Segment]) -> Vec<Block> {
    segments.iter().flat_map(Segment::to_blocks).collect()
}

/// Notification text sent alongside the blocks.
///
/// Slack shows it in push notifications and clients without block support.
/// Uses the job header if there is one, otherwise the first paragraph.
#[must_use]
pub fn fallback_text(segments: &[Segment]) -> Option<String> {
    let header = segments.iter().find_map(|s| match &s.kind {
        SegmentKind::Header { label, .. } => Some(label.clone()),
        _ => None,
    });
    header.or_else(|| {
        segments.iter().find_map(|s| match &s.kind {
            SegmentKind::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
    })
}

fn push_mentions(elements: &mut Vec<ContextElement>, mentions: Option<&str>) {
    if let Some(m) = mentions.filter(|m| !m.is_empty()) {
        elements.push(ContextElement::mrkdwn(m));
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
