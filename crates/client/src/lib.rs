//! Slackline - job status messages for Slack.
//!
//! This crate wraps the Slack Web API with the handful of operations a batch
//! job needs to report on itself:
//!
//! - [`slack::SlackClient`] - thin `chat.postMessage` / `chat.update` /
//!   `chat.postEphemeral` client
//! - [`slack::MessageBackend`] - the seam between the messenger and Slack, with
//!   a dry-run implementation for local runs
//! - [`messenger::SlackMessenger`] - accumulates message segments for one job
//!   and keeps a single Slack message up to date with them
//! - [`config`] - settings loaded from environment variables
//!
//! # Example
//!
//! ```rust,no_run
//! use slackline::messenger::{MessageBlock, MessengerOptions, SlackMessenger};
//! use slackline::slack::SlackClient;
//! use slackline_core::SlackConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SlackConfig::new("xoxb-...", Some("U123456"), None)?;
//! let backend = SlackClient::new(config.bot_token().clone());
//! let options = MessengerOptions::default().job_label("nightly-etl");
//!
//! let mut messenger = SlackMessenger::connect(&config, backend, "ops", options).await?;
//! messenger.add_message_block(MessageBlock::new("Loading orders").temporary());
//! messenger.update_block_message().await?;
//! messenger.add_message_block(MessageBlock::new("Loaded 1,204 orders"));
//! messenger.add_success_block().await?;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod messenger;
pub mod slack;

pub use messenger::{MessageBlock, MessengerError, MessengerOptions, SlackMessenger};
pub use slack::{DryRunBackend, MessageBackend, MessageHandle, SlackClient, SlackError};
