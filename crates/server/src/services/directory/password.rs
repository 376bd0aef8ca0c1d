//! Password hashing with Argon2id.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use secrecy::{ExposeSecret, SecretString};

use user_directory_core::StoredCredential;

use super::DirectoryError;
use crate::config::HashingConfig;

/// Hashes and verifies passwords.
///
/// Verification compares digests in constant time (argon2's verifier).
pub struct CredentialHasher {
    params: Params,
    pepper: Option<SecretString>,
}

impl CredentialHasher {
    /// Build a hasher from configured cost parameters.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Credential` if the parameters are out of range.
    pub fn new(config: &HashingConfig) -> Result<Self, DirectoryError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| DirectoryError::Credential(format!("invalid argon2 parameters: {e}")))?;

        Ok(Self {
            params,
            pepper: config.pepper.clone(),
        })
    }

    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Credential` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<StoredCredential, DirectoryError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| StoredCredential::new(hash.to_string()))
            .map_err(|e| DirectoryError::Credential(e.to_string()))
    }

    /// Check a password against a stored hash.
    ///
    /// An unparseable hash never verifies.
    #[must_use]
    pub fn verify(&self, password: &str, credential: &StoredCredential) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(credential.as_str()) else {
            tracing::warn!("stored credential is not a valid PHC string");
            return false;
        };

        self.argon2()
            .is_ok_and(|argon2| argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok())
    }

    fn argon2(&self) -> Result<Argon2<'_>, DirectoryError> {
        match &self.pepper {
            Some(pepper) => Argon2::new_with_secret(
                pepper.expose_secret().as_bytes(),
                Algorithm::Argon2id,
                Version::V0x13,
                self.params.clone(),
            )
            .map_err(|e| DirectoryError::Credential(e.to_string())),
            None => Ok(Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                self.params.clone(),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fast_config() -> HashingConfig {
        HashingConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
            pepper: None,
        }
    }

    #[test]
    fn test_hash_is_salted_phc() {
        let hasher = CredentialHasher::new(&fast_config()).unwrap();
        let first = hasher.hash("password123").unwrap();
        let second = hasher.hash("password123").unwrap();

        assert!(first.as_str().starts_with("$argon2id$"));
        assert!(!first.as_str().contains("password123"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify() {
        let hasher = CredentialHasher::new(&fast_config()).unwrap();
        let credential = hasher.hash("password123").unwrap();

        assert!(hasher.verify("password123", &credential));
        assert!(!hasher.verify("password124", &credential));
        assert!(!hasher.verify("", &credential));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let hasher = CredentialHasher::new(&fast_config()).unwrap();
        let credential = StoredCredential::new("password123".to_string());
        assert!(!hasher.verify("password123", &credential));
    }

    #[test]
    fn test_pepper_is_required_to_verify() {
        let peppered = CredentialHasher::new(&HashingConfig {
            pepper: Some(SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6")),
            ..fast_config()
        })
        .unwrap();
        let plain = CredentialHasher::new(&fast_config()).unwrap();

        let credential = peppered.hash("password123").unwrap();
        assert!(peppered.verify("password123", &credential));
        assert!(!plain.verify("password123", &credential));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let config = HashingConfig {
            parallelism: 0,
            ..fast_config()
        };
        assert!(matches!(
            CredentialHasher::new(&config),
            Err(DirectoryError::Credential(_))
        ));
    }
}
