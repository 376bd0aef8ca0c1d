//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameError {
    /// The input is empty or only whitespace.
    #[error("username cannot be empty")]
    Empty,
}

/// A username.
///
/// Any non-blank string is accepted and stored as submitted. Two usernames
/// collide when their lower-cased forms are equal.
///
/// ```
/// use user_directory_core::Username;
///
/// let name = Username::parse("Alice").unwrap();
/// assert_eq!(name.normalized(), "alice");
/// assert!(Username::parse("  ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`UsernameError::Empty`] if the input is blank after trimming.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.trim().is_empty() {
            return Err(UsernameError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Lower-cased index key for a raw username string.
    #[must_use]
    pub fn normalize(s: &str) -> String {
        s.to_lowercase()
    }

    /// Lower-cased index key for this username.
    #[must_use]
    pub fn normalized(&self) -> String {
        Self::normalize(&self.0)
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
