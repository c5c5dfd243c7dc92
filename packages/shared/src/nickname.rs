//! Display nickname rules.
//!
//! The client validates a nickname before it opens a connection, and the
//! server applies the same rules again before it accepts one.

use std::fmt;

use thiserror::Error;

/// Minimum nickname length, in characters, after trimming
pub const MIN_NICKNAME_LEN: usize = 2;

/// Maximum nickname length, in characters, after trimming
pub const MAX_NICKNAME_LEN: usize = 20;

/// Reasons a nickname is refused.
///
/// The `Display` output is the reason text shown next to the handshake prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NicknameError {
    #[error("empty")]
    Empty,

    #[error("too short")]
    TooShort,

    #[error("too long")]
    TooLong,

    #[error("disallowed characters")]
    DisallowedCharacters,
}

/// A validated, trimmed display nickname.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nickname(String);

impl Nickname {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Nickname {
    type Error = NicknameError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        validate(raw)
    }
}

/// Validate a raw nickname.
///
/// Rules are applied to the trimmed input, in order, and the first failure wins.
///
/// # Examples
///
/// ```
/// use cdc_feed_shared::nickname::{validate, NicknameError};
///
/// assert_eq!(validate("  Bruce Wayne  ").unwrap().as_str(), "Bruce Wayne");
/// assert_eq!(validate("a"), Err(NicknameError::TooShort));
/// ```
pub fn validate(raw: &str) -> Result<Nickname, NicknameError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();

    if len == 0 {
        return Err(NicknameError::Empty);
    }
    if len < MIN_NICKNAME_LEN {
        return Err(NicknameError::TooShort);
    }
    if len > MAX_NICKNAME_LEN {
        return Err(NicknameError::TooLong);
    }
    if !trimmed.chars().all(is_allowed_char) {
        return Err(NicknameError::DisallowedCharacters);
    }

    Ok(Nickname(trimmed.to_string()))
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-')
}
