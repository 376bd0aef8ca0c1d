//! Email address type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pattern every stored email must match in full.
///
/// Local part of ASCII letters, digits and `+_.-`, then a domain whose last
/// label is at least two letters.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@([A-Za-z0-9.-]+\.[A-Za-z]{2,})$").expect("Invalid regex")
});

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty or only whitespace.
    #[error("email cannot be empty")]
    Empty,
    /// The input does not look like `local@domain.tld`.
    #[error("email has an invalid format")]
    InvalidFormat,
}

/// An email address.
///
/// The value is kept exactly as submitted; uniqueness is decided on the
/// lower-cased form returned by [`Email::normalized`].
///
/// ## Examples
///
/// ```
/// use user_directory_core::Email;
///
/// // Valid emails
/// assert!(Email::parse("user@example.com").is_ok());
/// assert!(Email::parse("user.name+tag@domain.co.uk").is_ok());
///
/// // Invalid emails
/// assert!(Email::parse("").is_err());              // empty
/// assert!(Email::parse("invalid-email").is_err()); // missing @
/// assert!(Email::parse("user@domain.c").is_err()); // one-letter TLD
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError::Empty`] if the input is blank and
    /// [`EmailError::InvalidFormat`] if it does not match the address pattern.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.trim().is_empty() {
            return Err(EmailError::Empty);
        }

        if !Self::is_well_formed(s) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns whether `s` matches the address pattern, without allocating.
    #[must_use]
    pub fn is_well_formed(s: &str) -> bool {
        EMAIL_RE.is_match(s)
    }

    /// Lower-cased index key for a raw email string.
    #[must_use]
    pub fn normalize(s: &str) -> String {
        s.to_lowercase()
    }

    /// Lower-cased index key for this email.
    #[must_use]
    pub fn normalized(&self) -> String {
        Self::normalize(&self.0)
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name@example.com").is_ok());
        assert!(Email::parse("user+tag@example.com").is_ok());
        assert!(Email::parse("user_name-x@subdomain.example.com").is_ok());
        assert!(Email::parse("user@example.co.uk").is_ok());
        assert!(Email::parse("USER@EXAMPLE.COM").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_invalid_format() {
        for input in [
            "invalid-email",
            "@domain.com",
            "user@",
            "user@domain",
            "user@domain.c",
            "user@domain.c0m",
            "us er@example.com",
            " user@example.com",
            "user@@example.com",
        ] {
            assert_eq!(
                Email::parse(input),
                Err(EmailError::InvalidFormat),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_is_well_formed_matches_parse() {
        assert!(Email::is_well_formed("valid@example.com"));
        assert!(!Email::is_well_formed("invalid-email"));
    }

    #[test]
    fn test_value_kept_verbatim() {
        let email = Email::parse("Mixed.Case@Example.COM").unwrap();
        assert_eq!(email.as_str(), "Mixed.Case@Example.COM");
        assert_eq!(email.normalized(), "mixed.case@example.com");
    }

    #[test]
    fn test_normalize_raw() {
        assert_eq!(Email::normalize("A@B.Co"), "a@b.co");
    }

    #[test]
    fn test_display() {
        let email = Email::parse("user@example.com").unwrap();
        assert_eq!(format!("{email}"), "user@example.com");
    }

    #[test]
    fn test_serde_keeps_submitted_case() {
        let email = Email::parse("Ada@Example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"Ada@Example.com\"");

        let parsed: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, email);
    }

    #[test]
    fn test_from_str() {
        let email: Email = "user@example.com".parse().unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }
}
