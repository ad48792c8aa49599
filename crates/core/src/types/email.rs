//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is empty.
    #[error("email domain cannot be empty")]
    EmptyDomain,
    /// The local part contains invalid characters or separator placement.
    #[error("email local part is invalid")]
    InvalidLocalPart,
    /// The domain contains invalid characters or separator placement.
    #[error("email domain is invalid")]
    InvalidDomain,
    /// The domain does not end in a 2-3 character top-level domain.
    #[error("email domain must end in a 2-3 character top-level domain")]
    InvalidTld,
}

/// A normalized email address.
///
/// Parsing trims surrounding whitespace and lower-cases the input before
/// validating, so two `Email` values compare equal whenever the store's
/// unique index would consider them equal.
///
/// ## Constraints
///
/// - Length: 1-254 characters after trimming (RFC 5321 limit)
/// - Exactly one @ symbol
/// - Local part: alphanumeric/underscore segments joined by single `.` or `-`
/// - Domain: same segment rule, ending in `.` plus a 2-3 character TLD
///
/// ## Examples
///
/// ```
/// use userhub_core::Email;
///
/// let email = Email::parse("  Jane.Doe@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "jane.doe@example.com");
///
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("user@domain").is_err()); // missing TLD
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string, normalizing it in the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed, lower-cased input:
    /// - Is empty or longer than 254 characters
    /// - Does not contain exactly one @ symbol
    /// - Has an empty or malformed local part or domain
    /// - Does not end in a 2-3 character top-level domain
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let normalized = s.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(EmailError::Empty);
        }

        if normalized.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = normalized
            .split_once('@')
            .ok_or(EmailError::MissingAtSymbol)?;

        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }
        if !is_segmented(local) {
            return Err(EmailError::InvalidLocalPart);
        }

        // The TLD is the final dot-separated label of the domain.
        let Some((rest, tld)) = domain.rsplit_once('.') else {
            return Err(EmailError::InvalidTld);
        };
        if !is_segmented(rest) {
            return Err(EmailError::InvalidDomain);
        }
        if !(2..=3).contains(&tld.len()) || !tld.chars().all(is_word) {
            return Err(EmailError::InvalidTld);
        }

        Ok(Self(normalized))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the local part of the email (before the @).
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or("")
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or("")
    }
}

/// Word characters as the validation pattern understands them.
const fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Word-character segments joined by single `.` or `-` separators.
///
/// Rejects leading/trailing separators and consecutive separators, which
/// also rejects any stray `@` in the middle of a part.
fn is_segmented(s: &str) -> bool {
    let mut prev_was_separator = true;
    for c in s.chars() {
        if is_word(c) {
            prev_was_separator = false;
        } else if c == '.' || c == '-' {
            if prev_was_separator {
                return false;
            }
            prev_was_separator = true;
        } else {
            return false;
        }
    }
    !s.is_empty() && !prev_was_separator
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
