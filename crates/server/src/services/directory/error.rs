//! Directory error types.
//!
//! Domain outcomes (validation, not-found, authentication) carry the
//! structured payloads returned to callers. `Credential` and `Internal` are
//! unexpected faults and surface as transport failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{StoreError, UniqueIndex};

/// Machine-readable code of a validation failure.
pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";

/// Machine-readable code of an authentication failure.
pub const INVALID_CREDENTIALS_CODE: &str = "INVALID_CREDENTIALS";

pub(crate) const USERNAME_TAKEN: &str = "Username is already taken";
pub(crate) const EMAIL_TAKEN: &str = "Email is already taken";

/// One failing request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            message: message.into(),
        }
    }
}

/// Every failing field of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}: {} field error(s)", field_errors.len())]
pub struct ValidationError {
    pub code: String,
    pub message: String,
    pub field_errors: Vec<FieldError>,
}

impl ValidationError {
    /// Build a validation error from its field errors.
    #[must_use]
    pub fn new(field_errors: Vec<FieldError>) -> Self {
        Self {
            code: VALIDATION_ERROR_CODE.to_owned(),
            message: "Validation failed".to_owned(),
            field_errors,
        }
    }

    /// Whether any field error matches `field` and `message`.
    #[must_use]
    pub fn has(&self, field: &str, message: &str) -> bool {
        self.field_errors
            .iter()
            .any(|e| e.field == field && e.message == message)
    }
}

/// The referenced user does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct NotFoundError {
    pub message: String,
}

impl NotFoundError {
    /// Not-found error naming the requested id.
    #[must_use]
    pub fn user(id: &str) -> Self {
        Self {
            message: format!("User not found with id: {id}"),
        }
    }
}

/// Authentication failed. Identical for unknown email and wrong password.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AuthenticationError {
    pub code: String,
    pub message: String,
}

impl AuthenticationError {
    /// The single authentication failure callers ever see.
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self {
            code: INVALID_CREDENTIALS_CODE.to_owned(),
            message: "Invalid email or password".to_owned(),
        }
    }
}

/// Errors that can occur during directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// One or more request fields are invalid.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// User not found.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Invalid credentials (wrong password or unknown email).
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthenticationError),

    /// Password hashing error.
    #[error("password hashing error: {0}")]
    Credential(String),

    /// Store invariant violated.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for DirectoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict {
                index: UniqueIndex::Username,
                ..
            } => ValidationError::new(vec![FieldError::new("username", USERNAME_TAKEN)]).into(),
            StoreError::Conflict {
                index: UniqueIndex::Email,
                ..
            } => ValidationError::new(vec![FieldError::new("email", EMAIL_TAKEN)]).into(),
            StoreError::NotFound(id) => NotFoundError::user(&id.to_string()).into(),
            StoreError::DuplicateId(id) => Self::Internal(format!("duplicate user id {id}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use user_directory_core::UserId;

    use super::*;

    #[test]
    fn test_validation_error_shape() {
        let err = ValidationError::new(vec![FieldError::new("username", "Username is required")]);
        assert_eq!(err.code, "VALIDATION_ERROR");
        assert_eq!(err.message, "Validation failed");
        assert!(err.has("username", "Username is required"));
        assert!(!err.has("email", "Username is required"));
    }

    #[test]
    fn test_not_found_message_contains_id() {
        let err = NotFoundError::user("non-existent-id");
        assert_eq!(err.message, "User not found with id: non-existent-id");
    }

    #[test]
    fn test_conflict_maps_to_taken_message() {
        let err: DirectoryError = StoreError::Conflict {
            index: UniqueIndex::Email,
            key: "a@example.com".to_string(),
        }
        .into();
        assert!(matches!(err, DirectoryError::Validation(ref v) if v.has("email", EMAIL_TAKEN)));
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let id = UserId::generate();
        let err: DirectoryError = StoreError::NotFound(id).into();
        assert!(matches!(err, DirectoryError::NotFound(ref e) if e.message.contains(&id.to_string())));
    }
}
