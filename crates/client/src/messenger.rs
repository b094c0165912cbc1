//! Job status messenger.
//!
//! A [`SlackMessenger`] belongs to one job. It accumulates [`Segment`]s in
//! memory, posts them as a single block message, and then keeps updating that
//! message in place as the job progresses. Simple and ephemeral messages go
//! out directly.
//!
//! # Lifecycle
//!
//! 1. [`SlackMessenger::new`] - validates inputs, no I/O
//! 2. [`SlackMessenger::initialize_block_message`] or
//!    [`SlackMessenger::send_block_message`] - posts and records the handle
//! 3. `add_*` methods mutate the segment list; [`SlackMessenger::update_block_message`]
//!    (called implicitly by the success/error decorations) pushes a new revision
//!
//! [`SlackMessenger::connect`] does steps 1 and 2 in one go.

use chrono::Utc;
use slackline_core::segment::DEFAULT_ERROR_MESSAGE;
use slackline_core::{
    Channel, ChannelError, ImageRef, Segment, SegmentKind, SlackConfig, UserId, UserIdError,
    fallback_text, render,
};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::slack::{MessageBackend, MessageHandle, SlackError};

/// Errors returned by [`SlackMessenger`] operations.
#[derive(Debug, Error)]
pub enum MessengerError {
    /// The channel given at construction or as an override is invalid.
    #[error("Invalid channel: {0}")]
    InvalidChannel(#[from] ChannelError),

    /// An explicitly given recipient is invalid.
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(#[from] UserIdError),

    /// No recipient was given and no default recipient is configured.
    #[error("No recipient given and no default recipient configured")]
    MissingRecipient,

    /// The block message must be sent before it can be updated.
    #[error("Block message has not been sent yet")]
    NotSent,

    /// Slack rejected or failed to process the call.
    #[error(transparent)]
    Backend(#[from] SlackError),
}

/// Construction options for [`SlackMessenger`].
#[derive(Debug, Clone)]
pub struct MessengerOptions {
    /// Post the header message from [`SlackMessenger::connect`] when a job
    /// label is set. Defaults to `true`.
    pub auto_initialize: bool,
    /// Job name used for the header and alerts.
    pub job_label: Option<String>,
    /// Mention the configured stakeholders on success/error decorations.
    pub tag_stakeholders: bool,
}

impl Default for MessengerOptions {
    fn default() -> Self {
        Self {
            auto_initialize: true,
            job_label: None,
            tag_stakeholders: false,
        }
    }
}

impl MessengerOptions {
    /// Set the job label.
    #[must_use]
    pub fn job_label(mut self, label: impl Into<String>) -> Self {
        self.job_label = Some(label.into());
        self
    }

    /// Enable or disable the header post in [`SlackMessenger::connect`].
    #[must_use]
    pub fn auto_initialize(mut self, enabled: bool) -> Self {
        self.auto_initialize = enabled;
        self
    }

    /// Enable or disable stakeholder mentions on outcome decorations.
    #[must_use]
    pub fn tag_stakeholders(mut self, enabled: bool) -> Self {
        self.tag_stakeholders = enabled;
        self
    }
}

/// A paragraph to append to the block message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock {
    text: String,
    image: Option<ImageRef>,
    temporary: bool,
    tag_stakeholders: bool,
}

impl MessageBlock {
    /// A plain paragraph.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
            temporary: false,
            tag_stakeholders: false,
        }
    }

    /// Show an image next to the text.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>, alt_text: impl Into<String>) -> Self {
        self.image = Some(ImageRef::new(url, alt_text));
        self
    }

    /// Mark as a transient status line, replaced by the next message block.
    #[must_use]
    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    /// Mention the configured stakeholders under the text.
    #[must_use]
    pub fn tag_stakeholders(mut self) -> Self {
        self.tag_stakeholders = true;
        self
    }
}

impl From<&str> for MessageBlock {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for MessageBlock {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Sends and maintains the Slack messages of one job.
///
/// Not meant for concurrent use; give each job its own messenger.
#[derive(Debug)]
pub struct SlackMessenger<'a, B> {
    config: &'a SlackConfig,
    backend: B,
    channel: Channel,
    job_label: Option<String>,
    tag_stakeholders: bool,
    segments: Vec<Segment>,
    last_message: Option<MessageHandle>,
}

impl<'a, B: MessageBackend> SlackMessenger<'a, B> {
    /// Create a messenger. Performs no I/O.
    ///
    /// # Errors
    ///
    /// Returns [`MessengerError::InvalidChannel`] if `channel` is empty or
    /// malformed.
    pub fn new(
        config: &'a SlackConfig,
        backend: B,
        channel: &str,
        options: MessengerOptions,
    ) -> Result<Self, MessengerError> {
        Ok(Self {
            config,
            backend,
            channel: Channel::parse(channel)?,
            job_label: options.job_label,
            tag_stakeholders: options.tag_stakeholders,
            segments: Vec::new(),
            last_message: None,
        })
    }

    /// Create a messenger and, if `auto_initialize` is set and a job label is
    /// given, post the header message straight away.
    ///
    /// # Errors
    ///
    /// Returns construction errors from [`Self::new`] and backend errors from
    /// [`Self::initialize_block_message`].
    pub async fn connect(
        config: &'a SlackConfig,
        backend: B,
        channel: &str,
        options: MessengerOptions,
    ) -> Result<Self, MessengerError> {
        let auto_initialize = options.auto_initialize;
        let mut messenger = Self::new(config, backend, channel, options)?;

        if auto_initialize {
            if let Some(label) = messenger.job_label.clone() {
                messenger.initialize_block_message(&label).await?;
            }
        }

        Ok(messenger)
    }

    /// The channel this messenger posts to.
    #[must_use]
    pub const fn channel(&self) -> &Channel {
        &self.channel
    }

    /// The job label, if one was given or set by initialization.
    #[must_use]
    pub fn job_label(&self) -> Option<&str> {
        self.job_label.as_deref()
    }

    /// Segments of the current block message, in rendering order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Handle of the last posted or updated block message.
    #[must_use]
    pub const fn last_message(&self) -> Option<&MessageHandle> {
        self.last_message.as_ref()
    }

    /// The backend this messenger sends through.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    // =========================================================================
    // Direct messages
    // =========================================================================

    /// Post `text` as an unformatted message to the messenger's channel.
    ///
    /// # Errors
    ///
    /// Returns [`MessengerError::Backend`] if Slack rejects the call.
    pub async fn post_simple_message(&self, text: &str) -> Result<(), MessengerError> {
        self.post_simple_message_to(text, None, false).await
    }

    /// Post an unformatted message, optionally to another channel and with
    /// the stakeholders mentioned on the following lines.
    ///
    /// # Errors
    ///
    /// Returns [`MessengerError::InvalidChannel`] for a bad override, or
    /// [`MessengerError::Backend`] if Slack rejects the call.
    #[instrument(skip(self, text))]
    pub async fn post_simple_message_to(
        &self,
        text: &str,
        channel: Option<&str>,
        tag_stakeholders: bool,
    ) -> Result<(), MessengerError> {
        let target = self.target(channel)?;

        let mut message = text.to_owned();
        if tag_stakeholders && !self.config.stakeholders().is_empty() {
            message.push('\n');
            message.push_str(&self.config.stakeholder_mentions());
        }

        self.backend.post_text(&target, &message).await?;
        debug!(channel = %target, "Posted simple message");
        Ok(())
    }

    /// Send `text` visible only to `recipient`, falling back to the first
    /// default recipient.
    ///
    /// # Errors
    ///
    /// Returns [`MessengerError::MissingRecipient`] if no recipient is given
    /// and none is configured, or [`MessengerError::Backend`] if Slack rejects
    /// the call.
    pub async fn send_directed_message(
        &self,
        text: &str,
        recipient: Option<&str>,
    ) -> Result<(), MessengerError> {
        self.send_directed_message_to(text, recipient, None).await
    }

    /// Like [`Self::send_directed_message`], optionally in another channel.
    ///
    /// # Errors
    ///
    /// See [`Self::send_directed_message`]; also
    /// [`MessengerError::InvalidChannel`] for a bad override.
    #[instrument(skip(self, text))]
    pub async fn send_directed_message_to(
        &self,
        text: &str,
        recipient: Option<&str>,
        channel: Option<&str>,
    ) -> Result<(), MessengerError> {
        let recipient = match recipient {
            Some(r) => UserId::parse(r)?,
            None => self
                .config
                .default_recipient_1()
                .cloned()
                .ok_or(MessengerError::MissingRecipient)?,
        };
        let target = self.target(channel)?;

        self.backend
            .post_ephemeral(&target, recipient.as_str(), text)
            .await?;
        debug!(channel = %target, recipient = %recipient, "Sent directed message");
        Ok(())
    }

    // =========================================================================
    // Block message accumulation (no I/O)
    // =========================================================================

    /// Append a paragraph to the block message.
    ///
    /// A pending temporary paragraph is removed first, so at most one
    /// temporary segment exists at any time. Nothing is sent until the next
    /// send or update.
    ///
    /// Blocks whose text is empty or only whitespace are skipped, since Slack
    /// rejects a section without text. A skipped block leaves any temporary
    /// paragraph in place.
    pub fn add_message_block(&mut self, block: impl Into<MessageBlock>) {
        let block = block.into();
        if block.text.trim().is_empty() {
            warn!("Skipping message block with empty text");
            return;
        }

        let before = self.segments.len();
        self.segments.retain(|s| !s.temporary);
        if self.segments.len() != before {
            debug!("Replaced temporary segment");
        }

        let mentions = if block.tag_stakeholders {
            self.stakeholder_mentions()
        } else {
            None
        };

        self.segments.push(Segment {
            kind: SegmentKind::Text {
                text: block.text,
                image: block.image,
                mentions,
            },
            temporary: block.temporary,
        });
    }

    /// Append a divider.
    pub fn add_divider(&mut self) {
        self.segments.push(Segment::divider());
    }

    /// Append a small annotation line.
    pub fn add_context(&mut self, text: impl Into<String>) {
        self.segments.push(Segment::context(text));
    }

    /// Append a standalone image.
    pub fn add_image(&mut self, url: impl Into<String>, alt_text: impl Into<String>) {
        self.segments.push(Segment::image(ImageRef::new(url, alt_text)));
    }

    // =========================================================================
    // Block message delivery
    // =========================================================================

    /// Reset the block message to a header for `job_label` and post it.
    ///
    /// # Errors
    ///
    /// Returns [`MessengerError::Backend`] if the post fails. The segments are
    /// reset regardless.
    pub async fn initialize_block_message(
        &mut self,
        job_label: &str,
    ) -> Result<(), MessengerError> {
        let started_at = Utc::now().with_timezone(&self.config.timezone());

        self.job_label = Some(job_label.to_owned());
        self.segments = vec![Segment::header(job_label, started_at)];

        info!(job = %job_label, channel = %self.channel, "Initializing block message");
        self.send_block_message().await
    }

    /// Post the current segments as a new block message and remember its
    /// handle for later updates.
    ///
    /// # Errors
    ///
    /// Returns [`MessengerError::Backend`] if the post fails or Slack returns
    /// an empty handle.
    #[instrument(skip(self), fields(channel = %self.channel, segments = self.segments.len()))]
    pub async fn send_block_message(&mut self) -> Result<(), MessengerError> {
        let blocks = render(&self.segments);
        let fallback = fallback_text(&self.segments);

        let handle = self
            .backend
            .post_blocks(&self.channel.target(), blocks, fallback.as_deref())
            .await?;

        if handle.ts.is_empty() {
            return Err(MessengerError::Backend(SlackError::Response(
                "backend returned an empty message handle".to_string(),
            )));
        }

        debug!(ts = %handle.ts, "Block message sent");
        self.last_message = Some(handle);
        Ok(())
    }

    /// Re-render the segments and replace the last sent block message.
    ///
    /// # Errors
    ///
    /// Returns [`MessengerError::NotSent`] if no block message was sent yet,
    /// or [`MessengerError::Backend`] if the update fails.
    #[instrument(skip(self), fields(channel = %self.channel, segments = self.segments.len()))]
    pub async fn update_block_message(&mut self) -> Result<(), MessengerError> {
        let handle = self.last_message.as_ref().ok_or(MessengerError::NotSent)?;

        let blocks = render(&self.segments);
        let fallback = fallback_text(&self.segments);

        let updated = self
            .backend
            .update_blocks(handle, blocks, fallback.as_deref())
            .await?;

        debug!(ts = %updated.ts, "Block message updated");
        self.last_message = Some(updated);
        Ok(())
    }

    /// Append the success decoration and update the message.
    ///
    /// # Errors
    ///
    /// See [`Self::update_block_message`]. The segment stays appended on
    /// failure.
    pub async fn add_success_block(&mut self) -> Result<(), MessengerError> {
        let mentions = self.outcome_mentions();
        self.segments.push(Segment::success(mentions));
        self.update_block_message().await
    }

    /// Append the error decoration and update the message. With `notify`, each
    /// default recipient also gets a directed alert.
    ///
    /// The update is not rolled back if an alert fails. Every recipient is
    /// tried; the first alert failure is returned.
    ///
    /// # Errors
    ///
    /// Returns update errors as for [`Self::update_block_message`], then
    /// [`MessengerError::MissingRecipient`] if `notify` is set without any
    /// default recipients, or the first alert's [`MessengerError::Backend`].
    pub async fn add_error_block(
        &mut self,
        error_message: Option<&str>,
        notify: bool,
    ) -> Result<(), MessengerError> {
        let mentions = self.outcome_mentions();
        self.segments
            .push(Segment::error(error_message.map(str::to_owned), mentions));
        self.update_block_message().await?;

        if !notify {
            return Ok(());
        }

        let recipients: Vec<UserId> = self.config.default_recipients().cloned().collect();
        if recipients.is_empty() {
            warn!("Error alert requested but no default recipients are configured");
            return Err(MessengerError::MissingRecipient);
        }

        let alert = self.alert_text(error_message);
        let target = self.channel.target();
        let mut first_error = None;

        for recipient in &recipients {
            if let Err(e) = self
                .backend
                .post_ephemeral(&target, recipient.as_str(), &alert)
                .await
            {
                warn!(recipient = %recipient, error = %e, "Failed to send error alert");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), |e| Err(e.into()))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn target(&self, channel: Option<&str>) -> Result<String, MessengerError> {
        match channel {
            Some(c) => Ok(Channel::parse(c)?.target()),
            None => Ok(self.channel.target()),
        }
    }

    fn stakeholder_mentions(&self) -> Option<String> {
        let mentions = self.config.stakeholder_mentions();
        (!mentions.is_empty()).then_some(mentions)
    }

    fn outcome_mentions(&self) -> Option<String> {
        if self.tag_stakeholders {
            self.stakeholder_mentions()
        } else {
            None
        }
    }

    fn alert_text(&self, error_message: Option<&str>) -> String {
        let job = self.job_label.as_deref().unwrap_or("A job");
        let message = error_message.unwrap_or(DEFAULT_ERROR_MESSAGE);
        format!(":rotating_light: *{job}* failed in {}: {message}", self.channel.target())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::slack::DryRunBackend;

    fn config() -> SlackConfig {
        SlackConfig::builder()
            .bot_token("tok-1")
            .default_recipient_1("alice")
            .stakeholder("lead", "U123456")
            .build()
            .unwrap()
    }

    fn messenger(config: &SlackConfig) -> SlackMessenger<'_, DryRunBackend> {
        SlackMessenger::new(
            config,
            DryRunBackend::new(),
            "ops",
            MessengerOptions::default().auto_initialize(false),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_channel() {
        let config = config();
        let result =
            SlackMessenger::new(&config, DryRunBackend::new(), "", MessengerOptions::default());
        assert!(matches!(result, Err(MessengerError::InvalidChannel(_))));
    }

    #[test]
    fn test_new_performs_no_io() {
        let config = config();
        let messenger = SlackMessenger::new(
            &config,
            DryRunBackend::new(),
            "ops",
            MessengerOptions::default().job_label("nightly-etl"),
        )
        .unwrap();
        assert!(messenger.segments().is_empty());
        assert!(messenger.last_message().is_none());
        assert_eq!(messenger.job_label(), Some("nightly-etl"));
    }

    #[test]
    fn test_add_message_block_appends_in_order() {
        let config = config();
        let mut messenger = messenger(&config);
        messenger.add_message_block("one");
        messenger.add_message_block("two");
        messenger.add_message_block(
            MessageBlock::new("three").with_image("https://example.com/x.png", "x"),
        );

        let texts: Vec<_> = messenger
            .segments()
            .iter()
            .map(|s| match &s.kind {
                SegmentKind::Text { text, .. } => text.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert!(messenger.last_message().is_none());
    }

    #[test]
    fn test_temporary_block_replaced_by_next_block() {
        let config = config();
        let mut messenger = messenger(&config);
        messenger.add_message_block("done: extract");
        messenger.add_message_block(MessageBlock::new("transform running").temporary());
        messenger.add_message_block(MessageBlock::new("load running").temporary());

        assert_eq!(messenger.segments().len(), 2);
        assert_eq!(messenger.segments().iter().filter(|s| s.temporary).count(), 1);

        messenger.add_message_block("done: load");
        assert_eq!(messenger.segments().len(), 2);
        assert!(messenger.segments().iter().all(|s| !s.temporary));
    }

    #[test]
    fn test_blank_block_is_skipped() {
        let config = config();
        let mut messenger = messenger(&config);
        messenger.add_message_block(MessageBlock::new("loading").temporary());
        messenger.add_message_block("");
        messenger.add_message_block(
            MessageBlock::new("  \n").with_image("https://example.com/x.png", "x"),
        );

        assert_eq!(messenger.segments().len(), 1);
        assert!(messenger.segments()[0].temporary);
    }

    #[test]
    fn test_tagged_block_gets_mentions() {
        let config = config();
        let mut messenger = messenger(&config);
        messenger.add_message_block(MessageBlock::new("heads up").tag_stakeholders());
        assert!(matches!(
            &messenger.segments()[0].kind,
            SegmentKind::Text { mentions: Some(m), .. } if m == "<@U123456>\n"
        ));
    }

    #[test]
    fn test_other_segment_kinds() {
        let config = config();
        let mut messenger = messenger(&config);
        messenger.add_divider();
        messenger.add_context("rows: 10");
        messenger.add_image("https://example.com/x.png", "chart");
        assert_eq!(messenger.segments().len(), 3);
        assert_eq!(messenger.segments()[0], Segment::divider());
    }

    #[tokio::test]
    async fn test_update_before_send_fails() {
        let config = config();
        let mut messenger = messenger(&config);
        messenger.add_message_block("step");
        assert!(matches!(
            messenger.update_block_message().await,
            Err(MessengerError::NotSent)
        ));
    }

    #[tokio::test]
    async fn test_success_before_send_keeps_segment() {
        let config = config();
        let mut messenger = messenger(&config);
        assert!(matches!(
            messenger.add_success_block().await,
            Err(MessengerError::NotSent)
        ));
        assert_eq!(messenger.segments().len(), 1);
    }

    #[tokio::test]
    async fn test_send_sets_handle() {
        let config = config();
        let mut messenger = messenger(&config);
        messenger.add_message_block("step");
        messenger.send_block_message().await.unwrap();
        let handle = messenger.last_message().unwrap();
        assert_eq!(handle.channel, "#ops");
        assert!(!handle.ts.is_empty());
    }

    #[tokio::test]
    async fn test_connect_initializes_with_label() {
        let config = config();
        let messenger = SlackMessenger::connect(
            &config,
            DryRunBackend::new(),
            "ops",
            MessengerOptions::default().job_label("nightly-etl"),
        )
        .await
        .unwrap();
        assert_eq!(messenger.segments().len(), 1);
        assert!(matches!(
            &messenger.segments()[0].kind,
            SegmentKind::Header { label, .. } if label == "nightly-etl"
        ));
        assert!(messenger.last_message().is_some());
    }

    #[tokio::test]
    async fn test_connect_without_label_does_nothing() {
        let config = config();
        let messenger = SlackMessenger::connect(
            &config,
            DryRunBackend::new(),
            "ops",
            MessengerOptions::default(),
        )
        .await
        .unwrap();
        assert!(messenger.segments().is_empty());
        assert!(messenger.last_message().is_none());
    }

    #[tokio::test]
    async fn test_directed_message_without_any_recipient() {
        let config = SlackConfig::new("tok-1", None, None).unwrap();
        let messenger = messenger(&config);
        assert!(matches!(
            messenger.send_directed_message("psst", None).await,
            Err(MessengerError::MissingRecipient)
        ));
        assert!(messenger.send_directed_message("psst", Some("bob")).await.is_ok());
    }

    #[tokio::test]
    async fn test_directed_message_ignores_second_recipient() {
        let config = SlackConfig::new("tok-1", None, Some("bob")).unwrap();
        let messenger = messenger(&config);
        assert!(matches!(
            messenger.send_directed_message("psst", None).await,
            Err(MessengerError::MissingRecipient)
        ));
    }

    #[tokio::test]
    async fn test_notify_without_recipients_keeps_update() {
        let config = SlackConfig::new("tok-1", None, None).unwrap();
        let mut messenger = messenger(&config);
        messenger.send_block_message().await.unwrap();
        let result = messenger.add_error_block(Some("disk full"), true).await;
        assert!(matches!(result, Err(MessengerError::MissingRecipient)));
        assert!(matches!(
            &messenger.segments()[0].kind,
            SegmentKind::Error { message: Some(m), .. } if m == "disk full"
        ));
    }

    #[test]
    fn test_alert_text() {
        let config = config();
        let messenger = SlackMessenger::new(
            &config,
            DryRunBackend::new(),
            "ops",
            MessengerOptions::default().job_label("nightly-etl"),
        )
        .unwrap();
        assert_eq!(
            messenger.alert_text(Some("disk full")),
            ":rotating_light: *nightly-etl* failed in #ops: disk full"
        );
    }

    #[test]
    fn test_channel_override_validated() {
        let config = config();
        let messenger = messenger(&config);
        assert!(matches!(
            messenger.target(Some(" ")),
            Err(MessengerError::InvalidChannel(_))
        ));
        assert_eq!(messenger.target(Some("alerts")).unwrap(), "#alerts");
        assert_eq!(messenger.target(None).unwrap(), "#ops");
    }
}
