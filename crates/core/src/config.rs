//! Bot configuration: the credential and the people a job reports to.
//!
//! A [`SlackConfig`] is validated once at construction and immutable afterwards.
//! Messengers borrow it read-only.

use chrono_tz::Tz;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::types::{UserId, UserIdError};

/// Timezone used for header timestamps when none is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Amsterdam;

/// Errors raised while validating a [`SlackConfig`].
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    /// No bot token was supplied.
    #[error("Slack bot token is required")]
    MissingCredential,
    /// The bot token is empty or only whitespace.
    #[error("Slack bot token cannot be empty")]
    EmptyCredential,
    /// A default recipient was supplied but is not a valid member ID.
    #[error("Invalid default recipient: {0}")]
    InvalidRecipient(#[source] UserIdError),
    /// A stakeholder entry has an invalid member ID.
    #[error("Invalid member id for stakeholder '{name}': {source}")]
    InvalidStakeholder {
        /// Stakeholder display name.
        name: String,
        /// Underlying parse failure.
        #[source]
        source: UserIdError,
    },
}

/// A person tagged on job outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stakeholder {
    /// Display name, only used for logs and configuration.
    pub name: String,
    /// Slack member ID that gets mentioned.
    pub member_id: UserId,
}

/// Slack bot configuration.
///
/// Implements `Debug` manually to redact the bot token.
#[derive(Clone)]
pub struct SlackConfig {
    bot_token: SecretString,
    default_recipient_1: Option<UserId>,
    default_recipient_2: Option<UserId>,
    stakeholders: Vec<Stakeholder>,
    timezone: Tz,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &"[REDACTED]")
            .field("default_recipient_1", &self.default_recipient_1)
            .field("default_recipient_2", &self.default_recipient_2)
            .field("stakeholders", &self.stakeholders)
            .field("timezone", &self.timezone)
            .finish()
    }
}

impl SlackConfig {
    /// Create a configuration from a bot token and up to two default recipients.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValidationError::EmptyCredential`] if the token is blank,
    /// or [`ConfigValidationError::InvalidRecipient`] if a recipient is present
    /// but blank.
    pub fn new(
        bot_token: &str,
        default_recipient_1: Option<&str>,
        default_recipient_2: Option<&str>,
    ) -> Result<Self, ConfigValidationError> {
        let mut builder = Self::builder().bot_token(bot_token);
        if let Some(recipient) = default_recipient_1 {
            builder = builder.default_recipient_1(recipient);
        }
        if let Some(recipient) = default_recipient_2 {
            builder = builder.default_recipient_2(recipient);
        }
        builder.build()
    }

    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> SlackConfigBuilder {
        SlackConfigBuilder::default()
    }

    /// The bot token used to authenticate Web API calls.
    #[must_use]
    pub const fn bot_token(&self) -> &SecretString {
        &self.bot_token
    }

    /// First default recipient, used when a directed message names nobody.
    ///
    /// Never filled in from the second slot.
    #[must_use]
    pub const fn default_recipient_1(&self) -> Option<&UserId> {
        self.default_recipient_1.as_ref()
    }

    /// Second default recipient, only alerted by error decorations.
    #[must_use]
    pub const fn default_recipient_2(&self) -> Option<&UserId> {
        self.default_recipient_2.as_ref()
    }

    /// All configured default recipients, in order.
    pub fn default_recipients(&self) -> impl Iterator<Item = &UserId> {
        self.default_recipient_1
            .iter()
            .chain(self.default_recipient_2.iter())
    }

    /// Stakeholders in the order they were configured.
    #[must_use]
    pub fn stakeholders(&self) -> &[Stakeholder] {
        &self.stakeholders
    }

    /// Mentions for every stakeholder, one per line (`<@ID>\n`).
    ///
    /// Empty when no stakeholders are configured.
    #[must_use]
    pub fn stakeholder_mentions(&self) -> String {
        self.stakeholders
            .iter()
            .map(|s| format!("{}\n", s.member_id.mention()))
            .collect()
    }

    /// Timezone for header timestamps.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }
}

/// Builder for [`SlackConfig`]. Validation happens in [`SlackConfigBuilder::build`].
#[derive(Default)]
pub struct SlackConfigBuilder {
    bot_token: Option<SecretString>,
    recipient_1: Option<String>,
    recipient_2: Option<String>,
    stakeholders: Vec<(String, String)>,
    timezone: Option<Tz>,
}

impl SlackConfigBuilder {
    /// Set the bot token.
    #[must_use]
    pub fn bot_token(mut self, token: &str) -> Self {
        self.bot_token = Some(SecretString::from(token.to_owned()));
        self
    }

    /// Set the first default recipient.
    #[must_use]
    pub fn default_recipient_1(mut self, member_id: &str) -> Self {
        self.recipient_1 = Some(member_id.to_owned());
        self
    }

    /// Set the second default recipient.
    #[must_use]
    pub fn default_recipient_2(mut self, member_id: &str) -> Self {
        self.recipient_2 = Some(member_id.to_owned());
        self
    }

    /// Add a stakeholder to mention on job outcomes.
    #[must_use]
    pub fn stakeholder(mut self, name: &str, member_id: &str) -> Self {
        self.stakeholders.push((name.to_owned(), member_id.to_owned()));
        self
    }

    /// Set the header timezone.
    #[must_use]
    pub fn timezone(mut self, timezone: Tz) -> Self {
        self.timezone = Some(timezone);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigValidationError`] if the token is missing or blank, or
    /// a recipient or stakeholder ID is invalid.
    pub fn build(self) -> Result<SlackConfig, ConfigValidationError> {
        let bot_token = self
            .bot_token
            .ok_or(ConfigValidationError::MissingCredential)?;
        if bot_token.expose_secret().trim().is_empty() {
            return Err(ConfigValidationError::EmptyCredential);
        }

        let default_recipient_1 = parse_recipient(self.recipient_1.as_deref())?;
        let default_recipient_2 = parse_recipient(self.recipient_2.as_deref())?;

        let stakeholders = self
            .stakeholders
            .into_iter()
            .map(|(name, id)| match UserId::parse(&id) {
                Ok(member_id) => Ok(Stakeholder { name, member_id }),
                Err(source) => Err(ConfigValidationError::InvalidStakeholder { name, source }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SlackConfig {
            bot_token,
            default_recipient_1,
            default_recipient_2,
            stakeholders,
            timezone: self.timezone.unwrap_or(DEFAULT_TIMEZONE),
        })
    }
}

fn parse_recipient(member_id: Option<&str>) -> Result<Option<UserId>, ConfigValidationError> {
    member_id
        .map(UserId::parse)
        .transpose()
        .map_err(ConfigValidationError::InvalidRecipient)
}
