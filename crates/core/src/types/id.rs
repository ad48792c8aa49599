//! Store-assigned user identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UserId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    /// The identifier does not have the expected length.
    #[error("user id must be exactly {expected} characters")]
    WrongLength {
        /// Expected identifier length.
        expected: usize,
    },
    /// The identifier contains non-hexadecimal characters.
    #[error("user id must be hexadecimal")]
    NotHex,
}

/// A user identifier as assigned by the document store.
///
/// The store issues 24-character hexadecimal identifiers; this type checks
/// that shape without talking to the store, so malformed identifiers can be
/// rejected before any query runs. Parsing normalizes to lowercase.
///
/// ## Examples
///
/// ```
/// use userhub_core::UserId;
///
/// assert!(UserId::parse("64f1a2b3c4d5e6f708192a3b").is_ok());
/// assert!(UserId::parse("not-an-id").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Length of a store-assigned identifier.
    pub const LENGTH: usize = 24;

    /// Parse a `UserId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 hexadecimal
    /// characters.
    pub fn parse(s: &str) -> Result<Self, UserIdError> {
        if s.len() != Self::LENGTH {
            return Err(UserIdError::WrongLength {
                expected: Self::LENGTH,
            });
        }
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(UserIdError::NotHex);
        }
        Ok(Self(s.to_lowercase()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `UserId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = UserId::parse("64f1a2b3c4d5e6f708192a3b").unwrap();
        assert_eq!(id.as_str(), "64f1a2b3c4d5e6f708192a3b");
    }

    #[test]
    fn test_parse_normalizes_case() {
        let id = UserId::parse("64F1A2B3C4D5E6F708192A3B").unwrap();
        assert_eq!(id.as_str(), "64f1a2b3c4d5e6f708192a3b");
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            UserId::parse("abc123"),
            Err(UserIdError::WrongLength { expected: 24 })
        ));
        assert!(matches!(
            UserId::parse(""),
            Err(UserIdError::WrongLength { expected: 24 })
        ));
    }

    #[test]
    fn test_parse_not_hex() {
        assert!(matches!(
            UserId::parse("zzzzzzzzzzzzzzzzzzzzzzzz"),
            Err(UserIdError::NotHex)
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::parse("64f1a2b3c4d5e6f708192a3b").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"64f1a2b3c4d5e6f708192a3b\"");
    }

    #[test]
    fn test_display() {
        let id = UserId::parse("64f1a2b3c4d5e6f708192a3b").unwrap();
        assert_eq!(format!("{id}"), "64f1a2b3c4d5e6f708192a3b");
    }
}
