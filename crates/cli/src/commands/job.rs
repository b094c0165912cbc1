//! Job report command.
//!
//! Posts a header for the job, then keeps that one message updated as each
//! step runs. Every step is shown as a temporary "running" line first and
//! replaced by its final line, so the channel sees progress without a new
//! message per step.
//!
//! # Usage
//!
//! ```bash
//! slackline job --label nightly-etl --step "Extract" --step "Load"
//! slackline job --label nightly-etl --step "Extract" --fail "disk full" --notify
//! ```
//!
//! # Environment Variables
//!
//! - `SLACK_BOT_TOKEN` - Bot token (required)
//! - `SLACK_CHANNEL` - Channel for the job message (required)
//! - `SLACK_USER1`, `SLACK_USER2` - Recipients of `--notify` alerts
//! - `SLACK_STAKEHOLDERS` - `name=MEMBER_ID` pairs mentioned by `--tag-stakeholders`
//! - `SLACK_TIMEZONE` - IANA zone for the header timestamp
//! - `SEND_TO_SLACK` - Set to `true` to actually send

use slackline::{MessageBlock, MessageBackend, MessengerOptions, SlackMessenger};

use super::{CommandError, load_settings};

/// What to report for one job run.
#[derive(Debug, Clone, Default)]
pub struct JobRun {
    /// Job name shown in the header.
    pub label: String,
    /// Steps, in order.
    pub steps: Vec<String>,
    /// Error to finish with; `None` finishes with success.
    pub failure: Option<String>,
    /// Alert the default recipients on failure.
    pub notify: bool,
    /// Mention stakeholders on the outcome.
    pub tag_stakeholders: bool,
}

/// Report `job` to the configured channel.
pub async fn run(job: JobRun) -> Result<(), CommandError> {
    let settings = load_settings()?;
    let options = MessengerOptions::default()
        .job_label(&job.label)
        .tag_stakeholders(job.tag_stakeholders);

    let mut messenger = SlackMessenger::connect(
        &settings.slack,
        settings.backend(),
        settings.channel.as_str(),
        options,
    )
    .await?;

    report(&mut messenger, &job).await?;

    tracing::info!(job = %job.label, failed = job.failure.is_some(), "Job reported");
    Ok(())
}

/// Drive an initialized messenger through the steps and outcome of `job`.
pub async fn report<B: MessageBackend>(
    messenger: &mut SlackMessenger<'_, B>,
    job: &JobRun,
) -> Result<(), CommandError> {
    for step in &job.steps {
        messenger.add_message_block(MessageBlock::new(format!("{step} running")).temporary());
        messenger.update_block_message().await?;

        messenger.add_message_block(format!("{step} :white_check_mark:"));
        messenger.update_block_message().await?;
    }

    match &job.failure {
        Some(message) => {
            messenger
                .add_error_block(Some(message.as_str()), job.notify)
                .await?;
        }
        None => messenger.add_success_block().await?,
    }

    Ok(())
}
