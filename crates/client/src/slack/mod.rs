//! Slack Web API integration.
//!
//! This module provides:
//! - [`SlackClient`] for posting, updating and sending ephemeral messages
//! - [`MessageBackend`], the trait the messenger talks to
//! - [`DryRunBackend`] for runs that should only log what they would send
//!
//! # Flow
//!
//! 1. A job posts a block message and keeps the returned [`MessageHandle`]
//! 2. Each progress step re-renders the blocks and updates that message in place
//! 3. Alerts go out as ephemeral messages visible to a single member

mod backend;
mod client;
mod dry_run;
mod error;
mod types;

pub use backend::MessageBackend;
pub use client::{SLACK_API_BASE, SlackClient};
pub use dry_run::DryRunBackend;
pub use error::SlackError;
pub use types::{
    ApiResponse, EphemeralMessage, MessageHandle, PostMessageResponse, SlackMessage, TextMessage,
    UpdateMessage, UpdateMessageResponse,
};
