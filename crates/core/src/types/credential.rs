//! Stored credential type.
//!
//! Wraps the one-way hash kept for a user's password.

use core::fmt;

/// A password hash in PHC string format (for example `$argon2id$v=19$...`).
///
/// The wrapper never holds plaintext. `Debug` is redacted so a credential
/// cannot leak through logs, and the type is deliberately not `Serialize`.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredential(String);

impl StoredCredential {
    /// Wrap an encoded hash produced by a password hasher.
    #[must_use]
    pub const fn new(phc: String) -> Self {
        Self(phc)
    }

    /// Get the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredCredential([REDACTED])")
    }
}

impl AsRef<str> for StoredCredential {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_hash() {
        let credential = StoredCredential::new("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA".to_owned());
        let debug_output = format!("{credential:?}");
        assert!(!debug_output.contains("argon2id"));
        assert!(debug_output.contains("REDACTED"));
    }

    #[test]
    fn test_as_str() {
        let credential = StoredCredential::new("phc".to_owned());
        assert_eq!(credential.as_str(), "phc");
    }
}
