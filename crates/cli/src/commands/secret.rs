//! Directed (ephemeral) message command.
//!
//! # Usage
//!
//! ```bash
//! slackline secret "Credentials rotated"
//! slackline secret "Your export is ready" --user U0123ABCD
//! ```
//!
//! # Environment Variables
//!
//! - `SLACK_BOT_TOKEN` - Bot token (required)
//! - `SLACK_CHANNEL` - Default channel (required)
//! - `SLACK_USER1` - Recipient when `--user` is not given
//! - `SEND_TO_SLACK` - Set to `true` to actually send

use slackline::{MessengerOptions, SlackMessenger};

use super::{CommandError, load_settings};

/// Send `text` so only `user` (or the first default recipient) sees it.
pub async fn run(
    text: &str,
    user: Option<&str>,
    channel: Option<&str>,
) -> Result<(), CommandError> {
    let settings = load_settings()?;
    let messenger = SlackMessenger::new(
        &settings.slack,
        settings.backend(),
        settings.channel.as_str(),
        MessengerOptions::default().auto_initialize(false),
    )?;

    messenger.send_directed_message_to(text, user, channel).await?;

    tracing::info!("Directed message sent");
    Ok(())
}
