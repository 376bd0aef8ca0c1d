//! Request validation.
//!
//! Every field is checked independently and all failures are collected, so a
//! caller can fix a request in one round trip. Within a field only the first
//! failing rule is reported.

use user_directory_core::{Email, EmailError, UserId, Username};

use super::error::{EMAIL_TAKEN, FieldError, USERNAME_TAKEN, ValidationError};
use crate::config::PasswordPolicy;
use crate::models::{CreateUserRequest, UpdateUserRequest, User};
use crate::store::UserTables;

/// Read access to the unique indexes during validation.
pub trait IndexLookup {
    /// Owner of a normalized username key.
    fn username_owner(&self, key: &str) -> Option<UserId>;
    /// Owner of a normalized email key.
    fn email_owner(&self, key: &str) -> Option<UserId>;
}

impl IndexLookup for UserTables {
    fn username_owner(&self, key: &str) -> Option<UserId> {
        Self::username_owner(self, key)
    }

    fn email_owner(&self, key: &str) -> Option<UserId> {
        Self::email_owner(self, key)
    }
}

/// Lookup with no owners, for checks that do not need the store.
pub struct NoIndex;

impl IndexLookup for NoIndex {
    fn username_owner(&self, _key: &str) -> Option<UserId> {
        None
    }

    fn email_owner(&self, _key: &str) -> Option<UserId> {
        None
    }
}

/// Parsed values of a valid create request.
#[derive(Debug)]
pub struct NewUserFields {
    pub username: Username,
    pub email: Email,
}

/// Parsed values of a valid update request. `None` means "leave as is".
#[derive(Debug, Default)]
pub struct UserPatch {
    pub username: Option<Username>,
    pub email: Option<Email>,
}

#[derive(Default)]
struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.push(field, message);
                None
            }
        }
    }

    fn into_error(self) -> ValidationError {
        ValidationError::new(self.0)
    }
}

/// Validate a create request against the current indexes.
///
/// # Errors
///
/// Returns a `ValidationError` listing every failing field.
pub fn validate_new_user(
    request: &CreateUserRequest,
    policy: PasswordPolicy,
    index: &impl IndexLookup,
) -> Result<NewUserFields, ValidationError> {
    let mut errors = FieldErrors::default();

    let username = errors.check(
        "username",
        Username::parse(&request.username)
            .map_err(|_| "Username is required".to_string())
            .and_then(|username| {
                if index.username_owner(&username.normalized()).is_some() {
                    Err(USERNAME_TAKEN.to_string())
                } else {
                    Ok(username)
                }
            }),
    );

    let email = errors.check(
        "email",
        Email::parse(&request.email)
            .map_err(|e| match e {
                EmailError::Empty => "Email is required".to_string(),
                EmailError::InvalidFormat => "Invalid email format".to_string(),
            })
            .and_then(|email| {
                if index.email_owner(&email.normalized()).is_some() {
                    Err(EMAIL_TAKEN.to_string())
                } else {
                    Ok(email)
                }
            }),
    );

    if request.password.trim().is_empty() {
        errors.push("password", "Password is required");
    } else if request.password.chars().count() < policy.min_length {
        errors.push(
            "password",
            format!("Password must be at least {} characters", policy.min_length),
        );
    }

    if request.first_name.trim().is_empty() {
        errors.push("first_name", "First name is required");
    }

    if request.last_name.trim().is_empty() {
        errors.push("last_name", "Last name is required");
    }

    match (username, email) {
        (Some(username), Some(email)) if errors.0.is_empty() => {
            Ok(NewUserFields { username, email })
        }
        _ => Err(errors.into_error()),
    }
}

/// Validate the supplied fields of an update request for `current`.
///
/// "Did it change" compares against the stored value case-sensitively;
/// "does it collide" compares normalized keys and ignores the user's own key.
///
/// # Errors
///
/// Returns a `ValidationError` listing every failing field.
pub fn validate_patch(
    request: &UpdateUserRequest,
    current: &User,
    index: &impl IndexLookup,
) -> Result<UserPatch, ValidationError> {
    let mut errors = FieldErrors::default();
    let taken_by_other = |owner: Option<UserId>| owner.is_some_and(|id| id != current.id);

    let username = request.username.as_deref().and_then(|raw| {
        errors.check(
            "username",
            Username::parse(raw)
                .map_err(|_| "Username cannot be empty".to_string())
                .and_then(|username| {
                    let changed = raw != current.username.as_str();
                    if changed && taken_by_other(index.username_owner(&username.normalized())) {
                        Err(USERNAME_TAKEN.to_string())
                    } else {
                        Ok(username)
                    }
                }),
        )
    });

    let email = request.email.as_deref().and_then(|raw| {
        errors.check(
            "email",
            Email::parse(raw)
                .map_err(|e| match e {
                    EmailError::Empty => "Email cannot be empty".to_string(),
                    EmailError::InvalidFormat => "Invalid email format".to_string(),
                })
                .and_then(|email| {
                    let changed = raw != current.email.as_str();
                    if changed && taken_by_other(index.email_owner(&email.normalized())) {
                        Err(EMAIL_TAKEN.to_string())
                    } else {
                        Ok(email)
                    }
                }),
        )
    });

    if errors.0.is_empty() {
        Ok(UserPatch { username, email })
    } else {
        Err(errors.into_error())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;

    struct Owned(UserId);

    impl IndexLookup for Owned {
        fn username_owner(&self, _key: &str) -> Option<UserId> {
            Some(self.0)
        }

        fn email_owner(&self, _key: &str) -> Option<UserId> {
            Some(self.0)
        }
    }

    fn valid_request() -> CreateUserRequest {
        CreateUserRequest {
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
        }
    }

    fn current_user() -> User {
        let now = Utc::now();
        User {
            id: UserId::generate(),
            username: Username::parse("current").unwrap(),
            email: Email::parse("current@example.com").unwrap(),
            first_name: "Cur".to_string(),
            last_name: "Rent".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_valid_create() {
        let fields = validate_new_user(&valid_request(), PasswordPolicy::default(), &NoIndex).unwrap();
        assert_eq!(fields.username.as_str(), "testuser");
        assert_eq!(fields.email.as_str(), "test@example.com");
    }

    #[test]
    fn test_create_reports_every_field_in_order() {
        let request = CreateUserRequest {
            username: String::new(),
            email: "invalid-email".to_string(),
            password: "123".to_string(),
            first_name: String::new(),
            last_name: " ".to_string(),
        };
        let err = validate_new_user(&request, PasswordPolicy::default(), &NoIndex).unwrap_err();

        let fields: Vec<&str> = err.field_errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            ["username", "email", "password", "first_name", "last_name"]
        );
        assert!(err.has("email", "Invalid email format"));
        assert!(err.has("password", "Password must be at least 6 characters"));
    }

    #[test]
    fn test_create_blank_password_is_required_not_short() {
        let request = CreateUserRequest {
            password: "   ".to_string(),
            ..valid_request()
        };
        let err = validate_new_user(&request, PasswordPolicy::default(), &NoIndex).unwrap_err();
        assert_eq!(err.field_errors.len(), 1);
        assert!(err.has("password", "Password is required"));
    }

    #[test]
    fn test_create_policy_length_counts_characters() {
        let request = CreateUserRequest {
            password: "ñññññ".to_string(),
            ..valid_request()
        };
        let err = validate_new_user(&request, PasswordPolicy::default(), &NoIndex).unwrap_err();
        assert!(err.has("password", "Password must be at least 6 characters"));

        let policy = PasswordPolicy { min_length: 5 };
        assert!(validate_new_user(&request, policy, &NoIndex).is_ok());
    }

    #[test]
    fn test_create_taken_keys() {
        let err =
            validate_new_user(&valid_request(), PasswordPolicy::default(), &Owned(UserId::generate()))
                .unwrap_err();
        assert!(err.has("username", USERNAME_TAKEN));
        assert!(err.has("email", EMAIL_TAKEN));
    }

    #[test]
    fn test_create_format_error_wins_over_taken() {
        let request = CreateUserRequest {
            email: "invalid-email".to_string(),
            ..valid_request()
        };
        let err = validate_new_user(&request, PasswordPolicy::default(), &Owned(UserId::generate()))
            .unwrap_err();
        assert!(err.has("email", "Invalid email format"));
        assert!(!err.has("email", EMAIL_TAKEN));
    }

    #[test]
    fn test_patch_empty_request_is_noop() {
        let patch = validate_patch(&UpdateUserRequest::default(), &current_user(), &NoIndex).unwrap();
        assert!(patch.username.is_none());
        assert!(patch.email.is_none());
    }

    #[test]
    fn test_patch_blank_and_malformed() {
        let request = UpdateUserRequest {
            username: Some(String::new()),
            email: Some("nope".to_string()),
            ..UpdateUserRequest::default()
        };
        let err = validate_patch(&request, &current_user(), &NoIndex).unwrap_err();
        assert!(err.has("username", "Username cannot be empty"));
        assert!(err.has("email", "Invalid email format"));

        let request = UpdateUserRequest {
            email: Some(" ".to_string()),
            ..UpdateUserRequest::default()
        };
        let err = validate_patch(&request, &current_user(), &NoIndex).unwrap_err();
        assert!(err.has("email", "Email cannot be empty"));
    }

    #[test]
    fn test_patch_collision_with_other_user() {
        let request = UpdateUserRequest {
            username: Some("Other".to_string()),
            ..UpdateUserRequest::default()
        };
        let err = validate_patch(&request, &current_user(), &Owned(UserId::generate())).unwrap_err();
        assert!(err.has("username", USERNAME_TAKEN));
    }

    #[test]
    fn test_patch_own_key_is_not_a_collision() {
        let current = current_user();
        let request = UpdateUserRequest {
            username: Some("CURRENT".to_string()),
            email: Some("current@example.com".to_string()),
            ..UpdateUserRequest::default()
        };
        let patch = validate_patch(&request, &current, &Owned(current.id)).unwrap();
        assert_eq!(patch.username.unwrap().as_str(), "CURRENT");
        assert_eq!(patch.email.unwrap().as_str(), "current@example.com");
    }
}
