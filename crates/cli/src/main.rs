//! Slackline CLI - post job status messages to Slack from shell scripts.
//!
//! # Usage
//!
//! ```bash
//! # Post a plain message to the configured channel
//! slackline post "Deploy finished"
//!
//! # Post to another channel and mention the stakeholders
//! slackline post "Backfill done" --channel data-eng --tag-stakeholders
//!
//! # Send a message only the default recipient can see
//! slackline secret "Credentials rotated"
//!
//! # Report a whole job run as one updating message
//! slackline job --label nightly-etl --step "Extract" --step "Load"
//! slackline job --label nightly-etl --step "Extract" --fail "disk full" --notify
//! ```
//!
//! # Commands
//!
//! - `post` - Post an unformatted message
//! - `secret` - Post a message visible to one user
//! - `job` - Post a job header, its steps and the outcome
//!
//! Messages are only logged unless `SEND_TO_SLACK=true`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "slackline")]
#[command(author, version, about = "Post job status messages to Slack")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post an unformatted message
    Post {
        /// Message text
        text: String,

        /// Channel to post to instead of `SLACK_CHANNEL`
        #[arg(short, long)]
        channel: Option<String>,

        /// Mention the configured stakeholders below the message
        #[arg(short, long)]
        tag_stakeholders: bool,
    },
    /// Post a message only one user can see
    Secret {
        /// Message text
        text: String,

        /// Member ID of the recipient (defaults to `SLACK_USER1`)
        #[arg(short, long)]
        user: Option<String>,

        /// Channel to post in instead of `SLACK_CHANNEL`
        #[arg(short, long)]
        channel: Option<String>,
    },
    /// Report a job run as a single, updating block message
    Job {
        /// Job name shown in the header
        #[arg(short, long)]
        label: String,

        /// Step to report, in order (repeatable)
        #[arg(short, long = "step")]
        steps: Vec<String>,

        /// Finish with this error instead of success
        #[arg(short, long)]
        fail: Option<String>,

        /// Alert the default recipients when the job fails
        #[arg(short, long)]
        notify: bool,

        /// Mention the configured stakeholders on the outcome
        #[arg(short, long)]
        tag_stakeholders: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Post {
            text,
            channel,
            tag_stakeholders,
        } => commands::post::run(&text, channel.as_deref(), tag_stakeholders).await?,
        Commands::Secret {
            text,
            user,
            channel,
        } => commands::secret::run(&text, user.as_deref(), channel.as_deref()).await?,
        Commands::Job {
            label,
            steps,
            fail,
            notify,
            tag_stakeholders,
        } => {
            let run = commands::job::JobRun {
                label,
                steps,
                failure: fail,
                notify,
                tag_stakeholders,
            };
            commands::job::run(run).await?;
        }
    }
    Ok(())
}
