//! Core types for Slackline.
//!
//! This module provides type-safe wrappers for the identifiers Slack messages
//! are addressed with.

pub mod channel;
pub mod user;

pub use channel::{Channel, ChannelError};
pub use user::{UserId, UserIdError};
