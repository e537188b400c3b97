//! Egyptian mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The number does not start with a recognized Egyptian prefix.
    #[error("phone number must start with +201, 00201, or 01")]
    InvalidPrefix,
    /// The carrier digit after the prefix is not one of 0, 1, 2, or 5.
    #[error("phone number has an unrecognized carrier digit")]
    InvalidCarrier,
    /// The subscriber part is not exactly eight digits.
    #[error("phone number must end with eight digits")]
    InvalidSubscriber,
}

/// An Egyptian mobile number.
///
/// Accepts the `+201`, `00201`, and `01` prefixes followed by a carrier
/// digit (`0`, `1`, `2`, or `5`) and eight subscriber digits - the same
/// shape the registration and checkout forms accept.
///
/// ## Examples
///
/// ```
/// use fresh_cart_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("01012345678").is_ok());
/// assert!(PhoneNumber::parse("+201512345678").is_ok());
/// assert!(PhoneNumber::parse("01912345678").is_err()); // bad carrier digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not match the Egyptian mobile
    /// number shape described on the type.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let rest = s
            .strip_prefix("+201")
            .or_else(|| s.strip_prefix("00201"))
            .or_else(|| s.strip_prefix("01"))
            .ok_or(PhoneError::InvalidPrefix)?;

        let mut chars = rest.chars();
        let carrier = chars.next().ok_or(PhoneError::InvalidCarrier)?;
        if !matches!(carrier, '0' | '1' | '2' | '5') {
            return Err(PhoneError::InvalidCarrier);
        }

        let subscriber: Vec<char> = chars.collect();
        if subscriber.len() != 8 || !subscriber.iter().all(char::is_ascii_digit) {
            return Err(PhoneError::InvalidSubscriber);
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_prefixes() {
        assert!(PhoneNumber::parse("01012345678").is_ok());
        assert!(PhoneNumber::parse("+201112345678").is_ok());
        assert!(PhoneNumber::parse("00201212345678").is_ok());
    }

    #[test]
    fn test_invalid_prefix() {
        assert_eq!(
            PhoneNumber::parse("21012345678"),
            Err(PhoneError::InvalidPrefix)
        );
    }

    #[test]
    fn test_invalid_carrier() {
        assert_eq!(
            PhoneNumber::parse("01912345678"),
            Err(PhoneError::InvalidCarrier)
        );
    }

    #[test]
    fn test_subscriber_length() {
        assert_eq!(
            PhoneNumber::parse("0101234567"),
            Err(PhoneError::InvalidSubscriber)
        );
        assert_eq!(
            PhoneNumber::parse("010123456789"),
            Err(PhoneError::InvalidSubscriber)
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
    }
}
