//! Brazilian mobile phone helpers and type.
//!
//! A valid number is DDD plus a 9-digit mobile number: exactly 11 digits with
//! `9` in the third position. All-identical digit strings are rejected as
//! synthetic input (`11999999999` is someone mashing a key, not a phone).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum digits in a Brazilian mobile number (2-digit DDD + 9 digits).
pub const MAX_DIGITS: usize = 11;

/// Strip every non-digit character and truncate to at most 11 digits.
///
/// Never fails; the result may be shorter than 11 digits.
#[must_use]
pub fn normalize_digits(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_DIGITS)
        .collect()
}

/// Apply the progressive `(DD) XXXXX-XXXX` display mask.
///
/// The mask grows as digits accumulate:
/// - 0 digits: empty string
/// - 1-2 digits: `(DD`
/// - 3-7 digits: `(DD) XXXXX`
/// - 8-11 digits: `(DD) XXXXX-XXXX`
///
/// Stable under repeated application once 11 digits are reached, and never
/// panics on empty or malformed input.
#[must_use]
pub fn format_display(input: &str) -> String {
    let d = normalize_digits(input);

    // d is ASCII digits only, so byte slicing is char-safe
    match d.len() {
        0 => String::new(),
        1..=2 => format!("({d}"),
        3..=7 => format!("({}) {}", &d[..2], &d[2..]),
        _ => format!("({}) {}-{}", &d[..2], &d[2..7], &d[7..]),
    }
}

/// Whether a digit string is a plausible Brazilian mobile number.
///
/// True iff the input is exactly 11 digits, the third digit is `9`, and the
/// string is not 11 repetitions of a single digit. All three conditions are
/// conjunctive.
#[must_use]
pub fn is_valid_br_mobile(digits: &str) -> bool {
    let bytes = digits.as_bytes();

    if bytes.len() != MAX_DIGITS || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }

    if bytes.get(2) != Some(&b'9') {
        return false;
    }

    let Some(&first) = bytes.first() else {
        return false;
    };
    !bytes.iter().all(|&b| b == first)
}

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input does not contain exactly 11 digits.
    #[error("phone must have exactly 11 digits (got {len})")]
    WrongLength {
        /// Number of digits found.
        len: usize,
    },
    /// The third digit is not `9`, so this is not a mobile number.
    #[error("phone must be a mobile number (third digit 9)")]
    NotMobile,
    /// Every digit is identical.
    #[error("phone looks like synthetic input")]
    RepeatedDigits,
}

/// A validated Brazilian mobile phone number, stored digits-only.
///
/// ```
/// use precheckout_core::Phone;
///
/// let phone = Phone::parse("(11) 98765-4321").expect("valid number");
/// assert_eq!(phone.digits(), "11987654321");
///
/// assert!(Phone::parse("(11) 8765-4321").is_err());  // 10 digits
/// assert!(Phone::parse("11888888888").is_err());     // third digit not 9
/// assert!(Phone::parse("99999999999").is_err());     // all identical
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from raw input, stripping mask characters.
    ///
    /// Unlike [`normalize_digits`], input with more than 11 digits is
    /// rejected rather than truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit count is not exactly 11, the third
    /// digit is not `9`, or every digit is identical.
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();

        if digits.len() != MAX_DIGITS {
            return Err(PhoneError::WrongLength { len: digits.len() });
        }

        if digits.as_bytes().get(2) != Some(&b'9') {
            return Err(PhoneError::NotMobile);
        }

        if !is_valid_br_mobile(&digits) {
            return Err(PhoneError::RepeatedDigits);
        }

        Ok(Self(digits))
    }

    /// Returns the digits-only form.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Returns the masked display form, `(DD) XXXXX-XXXX`.
    #[must_use]
    pub fn display_masked(&self) -> String {
        format_display(&self.0)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
