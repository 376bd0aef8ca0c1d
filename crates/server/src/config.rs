//! Directory configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `USER_DIRECTORY_HOST` - Bind address (default: 127.0.0.1)
//! - `USER_DIRECTORY_PORT` - Listen port (default: 50051)
//! - `USER_DIRECTORY_MIN_PASSWORD_LENGTH` - Minimum password length on create (default: 6)
//! - `USER_DIRECTORY_ARGON2_MEMORY_KIB` - Argon2 memory cost in KiB (default: 19456)
//! - `USER_DIRECTORY_ARGON2_ITERATIONS` - Argon2 time cost (default: 2)
//! - `USER_DIRECTORY_ARGON2_PARALLELISM` - Argon2 lanes (default: 1)
//! - `USER_DIRECTORY_PASSWORD_PEPPER` - Server-side secret mixed into every password hash
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (e.g. production)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of calls traced, 0.0 to 1.0 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "pepper",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// User directory configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Rules applied to new passwords
    pub password_policy: PasswordPolicy,
    /// Password hashing parameters
    pub hashing: HashingConfig,
    /// Error tracking, present only when `SENTRY_DSN` is set
    pub sentry: Option<SentryConfig>,
}

/// Sentry settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SentryConfig {
    pub dsn: String,
    pub environment: Option<String>,
    pub traces_sample_rate: f32,
}

/// Password rules enforced when a user is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum number of characters.
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

/// Argon2id cost parameters and optional pepper.
///
/// Implements `Debug` manually to redact the pepper.
#[derive(Clone)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
    /// Secret key mixed into every hash (server-side only)
    pub pepper: Option<SecretString>,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
            pepper: None,
        }
    }
}

impl std::fmt::Debug for HashingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashingConfig")
            .field("memory_kib", &self.memory_kib)
            .field("iterations", &self.iterations)
            .field("parallelism", &self.parallelism)
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl DirectoryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or if the pepper
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env_or_default::<IpAddr>("USER_DIRECTORY_HOST", "127.0.0.1")?;
        let port = parse_env_or_default::<u16>("USER_DIRECTORY_PORT", "50051")?;
        let min_length = parse_env_or_default::<usize>(
            "USER_DIRECTORY_MIN_PASSWORD_LENGTH",
            &DEFAULT_MIN_PASSWORD_LENGTH.to_string(),
        )?;

        let hashing = HashingConfig::from_env()?;

        Ok(Self {
            host,
            port,
            password_policy: PasswordPolicy { min_length },
            hashing,
            sentry: SentryConfig::from_env()?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl SentryConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(dsn) = get_optional_env("SENTRY_DSN") else {
            return Ok(None);
        };

        let traces_sample_rate = parse_env_or_default::<f32>("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;
        if !(0.0..=1.0).contains(&traces_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_TRACES_SAMPLE_RATE".to_string(),
                format!("{traces_sample_rate} is outside 0.0..=1.0"),
            ));
        }

        Ok(Some(Self {
            dsn,
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
            traces_sample_rate,
        }))
    }
}

impl HashingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            memory_kib: parse_env_or_default(
                "USER_DIRECTORY_ARGON2_MEMORY_KIB",
                &defaults.memory_kib.to_string(),
            )?,
            iterations: parse_env_or_default(
                "USER_DIRECTORY_ARGON2_ITERATIONS",
                &defaults.iterations.to_string(),
            )?,
            parallelism: parse_env_or_default(
                "USER_DIRECTORY_ARGON2_PARALLELISM",
                &defaults.parallelism.to_string(),
            )?,
            pepper: get_optional_env("USER_DIRECTORY_PASSWORD_PEPPER")
                .map(|value| {
                    validate_secret_strength(&value, "USER_DIRECTORY_PASSWORD_PEPPER")?;
                    Ok(SecretString::from(value))
                })
                .transpose()?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real secrets have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-pepper-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_env_or_default_uses_default() {
        let port: u16 =
            parse_env_or_default("USER_DIRECTORY_TEST_UNSET_PORT_VARIABLE", "50051").unwrap();
        assert_eq!(port, 50051);
    }

    #[test]
    fn test_parse_env_or_default_reports_key() {
        let err =
            parse_env_or_default::<u16>("USER_DIRECTORY_TEST_UNSET_PORT_VARIABLE", "not-a-port")
                .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "USER_DIRECTORY_TEST_UNSET_PORT_VARIABLE")
        );
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(PasswordPolicy::default().min_length, 6);
    }

    #[test]
    fn test_socket_addr() {
        let config = DirectoryConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 50051,
            password_policy: PasswordPolicy::default(),
            hashing: HashingConfig::default(),
            sentry: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 50051);
    }

    #[test]
    fn test_hashing_config_debug_redacts_pepper() {
        let config = HashingConfig {
            pepper: Some(SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6")),
            ..HashingConfig::default()
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("memory_kib"));
        assert!(!debug_output.contains("aB3$xY9"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
