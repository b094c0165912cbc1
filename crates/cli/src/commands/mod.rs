//! Subcommand implementations.

pub mod job;
pub mod post;
pub mod secret;

use slackline::config::{ConfigError, Settings};
use slackline::MessengerError;
use thiserror::Error;

/// Errors shared by every subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Slack rejected a message or the messenger was misused.
    #[error("Slack error: {0}")]
    Messenger(#[from] MessengerError),
}

/// Load settings from the environment.
fn load_settings() -> Result<Settings, CommandError> {
    let settings = Settings::from_env()?;
    tracing::debug!(
        channel = %settings.channel,
        send_to_slack = settings.send_to_slack,
        "Loaded settings"
    );
    Ok(settings)
}
