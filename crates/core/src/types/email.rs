//! Email address type.
//!
//! Validation here is intentionally a coarse sanity check, not RFC 5322
//! parsing. The capture form only needs to weed out obviously broken input;
//! the commerce platform is the authority on what it will accept.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The trimmed input is shorter than the minimum length.
    #[error("email must be at least {min} characters")]
    TooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The input does not contain an @ symbol.
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    /// The input does not contain a dot.
    #[error("email must contain a dot")]
    MissingDot,
    /// The input contains whitespace after trimming.
    #[error("email must not contain whitespace")]
    ContainsWhitespace,
}

/// A shopper's email address, trimmed on parse.
///
/// ## Constraints
///
/// After trimming, the input must be at least 5 characters, contain an `@`
/// and a `.`, and contain no interior whitespace. Anything beyond that is
/// deliberately left to the platform.
///
/// ## Examples
///
/// ```
/// use precheckout_core::Email;
///
/// assert!(Email::parse("a@b.c").is_ok());
/// assert!(Email::parse("  user@example.com  ").is_ok());
///
/// assert!(Email::parse("a@b").is_err());     // no dot
/// assert!(Email::parse("a b@c.d").is_err()); // whitespace
/// assert!(Email::parse("").is_err());        // empty
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Minimum length of an email address (`a@b.c`).
    pub const MIN_LENGTH: usize = 5;

    /// Parse an `Email` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input:
    /// - Contains whitespace
    /// - Is shorter than 5 characters
    /// - Does not contain an `@` or a `.`
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let trimmed = s.trim();

        if trimmed.contains(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        if trimmed.len() < Self::MIN_LENGTH {
            return Err(EmailError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if !trimmed.contains('@') {
            return Err(EmailError::MissingAtSymbol);
        }

        if !trimmed.contains('.') {
            return Err(EmailError::MissingDot);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Whether the input passes the coarse email check.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
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
