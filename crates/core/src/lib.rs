//! Slackline Core - Shared types library.
//!
//! This crate provides the I/O-free half of Slackline:
//! - [`config`] - Validated bot configuration (token, default recipients, stakeholders)
//! - [`types`] - Newtype wrappers for channels and Slack member IDs
//! - [`blocks`] - The subset of Slack Block Kit that job status messages use
//! - [`segment`] - Message segments accumulated by a job and their rendering into blocks
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients and no
//! clocks beyond what callers pass in. The `slackline` crate owns everything that
//! talks to Slack.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod blocks;
pub mod config;
pub mod segment;
pub mod types;

pub use blocks::{Accessory, Block, ContextElement, PlainText, Text};
pub use config::{ConfigValidationError, SlackConfig, SlackConfigBuilder, Stakeholder};
pub use segment::{ImageRef, Segment, SegmentKind, fallback_text, render};
pub use types::*;
