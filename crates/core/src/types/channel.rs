//! Slack channel reference type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Channel`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The input string is empty (or only whitespace).
    #[error("channel cannot be empty")]
    Empty,
    /// The input is a bare `#` with no name.
    #[error("channel name cannot be empty")]
    EmptyName,
    /// The input contains whitespace.
    #[error("channel cannot contain whitespace")]
    ContainsWhitespace,
}

/// A Slack channel, given either by name (`ops`, `#ops`) or by conversation ID
/// (`C0123ABCD`).
///
/// ## Examples
///
/// ```
/// use slackline_core::Channel;
///
/// assert_eq!(Channel::parse("ops").unwrap().target(), "#ops");
/// assert_eq!(Channel::parse("#ops").unwrap().target(), "#ops");
/// assert_eq!(Channel::parse("C0123ABCD").unwrap().target(), "C0123ABCD");
/// assert!(Channel::parse("").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Channel(String);

impl Channel {
    /// Parse a `Channel` from a string. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is a lone `#`, or contains
    /// inner whitespace.
    pub fn parse(s: &str) -> Result<Self, ChannelError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ChannelError::Empty);
        }

        if trimmed == "#" {
            return Err(ChannelError::EmptyName);
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(ChannelError::ContainsWhitespace);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the channel exactly as it was given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this looks like a Slack conversation ID rather than a name.
    ///
    /// Public channels start with `C`, private channels with `G` and direct
    /// messages with `D`; IDs are uppercase alphanumeric.
    #[must_use]
    pub fn is_conversation_id(&self) -> bool {
        let mut chars = self.0.chars();
        matches!(chars.next(), Some('C' | 'G' | 'D'))
            && self.0.len() >= 9
            && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    }

    /// The value sent as `channel` to the Web API.
    ///
    /// Conversation IDs and `#name` references pass through; a bare name gets
    /// a `#` prefix.
    #[must_use]
    pub fn target(&self) -> String {
        if self.0.starts_with('#') || self.is_conversation_id() {
            self.0.clone()
        } else {
            format!("#{}", self.0)
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Channel {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Channel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_channels() {
        assert!(Channel::parse("ops").is_ok());
        assert!(Channel::parse("#data-alerts").is_ok());
        assert!(Channel::parse("C0123ABCD").is_ok());
        assert!(Channel::parse("  ops  ").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Channel::parse(""), Err(ChannelError::Empty)));
        assert!(matches!(Channel::parse("   "), Err(ChannelError::Empty)));
    }

    #[test]
    fn test_parse_lone_hash() {
        assert!(matches!(Channel::parse("#"), Err(ChannelError::EmptyName)));
    }

    #[test]
    fn test_parse_inner_whitespace() {
        assert!(matches!(
            Channel::parse("data alerts"),
            Err(ChannelError::ContainsWhitespace)
        ));
    }

    #[test]
    fn test_trims_input() {
        assert_eq!(Channel::parse("  ops ").unwrap().as_str(), "ops");
    }

    #[test]
    fn test_target_prefixes_bare_names() {
        assert_eq!(Channel::parse("ops").unwrap().target(), "#ops");
        assert_eq!(Channel::parse("#ops").unwrap().target(), "#ops");
    }

    #[test]
    fn test_target_keeps_conversation_ids() {
        assert_eq!(Channel::parse("C0123ABCD").unwrap().target(), "C0123ABCD");
        assert_eq!(Channel::parse("G01ABCDEF9").unwrap().target(), "G01ABCDEF9");
        assert_eq!(Channel::parse("D0ZZZZZZZ").unwrap().target(), "D0ZZZZZZZ");
    }

    #[test]
    fn test_short_or_lowercase_names_are_not_ids() {
        // "Cats" starts with C but is a channel name
        assert!(!Channel::parse("Cats").unwrap().is_conversation_id());
        assert!(!Channel::parse("c0123abcd").unwrap().is_conversation_id());
        assert_eq!(Channel::parse("Cats").unwrap().target(), "#Cats");
    }

    #[test]
    fn test_display() {
        let channel = Channel::parse("#ops").unwrap();
        assert_eq!(format!("{channel}"), "#ops");
    }

    #[test]
    fn test_from_str() {
        let channel: Channel = "ops".parse().unwrap();
        assert_eq!(channel.as_str(), "ops");
    }
}
