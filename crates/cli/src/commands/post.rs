//! Plain message command.
//!
//! # Usage
//!
//! ```bash
//! slackline post "Deploy finished"
//! slackline post "Backfill done" --channel data-eng --tag-stakeholders
//! ```
//!
//! # Environment Variables
//!
//! - `SLACK_BOT_TOKEN` - Bot token (required)
//! - `SLACK_CHANNEL` - Default channel (required)
//! - `SLACK_STAKEHOLDERS` - `name=MEMBER_ID` pairs mentioned by `--tag-stakeholders`
//! - `SEND_TO_SLACK` - Set to `true` to actually send

use slackline::{MessengerOptions, SlackMessenger};

use super::{CommandError, load_settings};

/// Post `text` to the configured channel or `channel`.
pub async fn run(
    text: &str,
    channel: Option<&str>,
    tag_stakeholders: bool,
) -> Result<(), CommandError> {
    let settings = load_settings()?;
    let messenger = SlackMessenger::new(
        &settings.slack,
        settings.backend(),
        settings.channel.as_str(),
        MessengerOptions::default().auto_initialize(false),
    )?;

    messenger
        .post_simple_message_to(text, channel, tag_stakeholders)
        .await?;

    tracing::info!("Message posted");
    Ok(())
}
