//! User directory service.
//!
//! Create, read, update and authenticate users, plus availability checks
//! for usernames and emails. All state lives in an in-memory [`UserStore`].
//!
//! Domain outcomes come back as [`DirectoryError`] variants carrying the
//! structured payload for the caller; only `Credential`/`Internal` are faults.

mod error;
mod password;
mod validation;

pub use error::{
    AuthenticationError, DirectoryError, FieldError, INVALID_CREDENTIALS_CODE, NotFoundError,
    VALIDATION_ERROR_CODE, ValidationError,
};
pub use password::CredentialHasher;

use chrono::{DateTime, TimeDelta, Utc};

use user_directory_core::{Email, StoredCredential, UserId, Username};

use crate::config::{HashingConfig, PasswordPolicy};
use crate::models::{
    AuthenticateUserRequest, CreateUserRequest, EmailCheck, UpdateUserRequest, User,
    UsernameCheck,
};
use crate::store::UserStore;
use validation::{NewUserFields, NoIndex, UserPatch};

/// The user directory.
///
/// One instance owns one isolated store; share it behind an `Arc`.
pub struct UserDirectory {
    store: UserStore,
    hasher: CredentialHasher,
    policy: PasswordPolicy,
    /// Verified against when an email is unknown, so both failure paths do
    /// the same work.
    decoy: StoredCredential,
}

impl UserDirectory {
    /// Create an empty directory.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Credential` if the hashing parameters are invalid.
    pub fn new(policy: PasswordPolicy, hashing: &HashingConfig) -> Result<Self, DirectoryError> {
        let hasher = CredentialHasher::new(hashing)?;
        let decoy = hasher.hash(&UserId::generate().to_string())?;

        Ok(Self {
            store: UserStore::new(),
            hasher,
            policy,
            decoy,
        })
    }

    /// Number of users in the directory.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.store.read().len()
    }

    /// Create a user.
    ///
    /// Requests failing the format checks are answered from a read lock
    /// without hashing. Otherwise the password is hashed before the write
    /// lock is taken; the uniqueness checks and all inserts then happen under
    /// one guard.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Validation` listing every failing field.
    /// Returns `DirectoryError::Credential` if hashing fails.
    pub fn create_user(&self, request: &CreateUserRequest) -> Result<User, DirectoryError> {
        if let Err(rejected) = validation::validate_new_user(request, self.policy, &NoIndex) {
            let full = validation::validate_new_user(request, self.policy, &*self.store.read())
                .err()
                .unwrap_or(rejected);
            tracing::debug!(field_count = full.field_errors.len(), "create rejected");
            return Err(full.into());
        }

        let credential = self.hasher.hash(&request.password)?;

        let mut tables = self.store.write();
        let NewUserFields { username, email } =
            validation::validate_new_user(request, self.policy, &*tables).inspect_err(|e| {
                tracing::debug!(field_count = e.field_errors.len(), "create rejected");
            })?;

        let now = Utc::now();
        let user = User {
            id: UserId::generate(),
            username,
            email,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            created_at: now,
            updated_at: now,
        };

        tables.insert(user.clone(), credential)?;
        drop(tables);

        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// An ID that is not a UUID is reported as not found.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the user doesn't exist.
    pub fn get_user(&self, id: &str) -> Result<User, DirectoryError> {
        id.parse::<UserId>()
            .ok()
            .and_then(|user_id| self.store.read().get(&user_id).cloned())
            .ok_or_else(|| NotFoundError::user(id).into())
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the user doesn't exist (checked first).
    /// Returns `DirectoryError::Validation` listing every failing field.
    pub fn update_user(&self, request: &UpdateUserRequest) -> Result<User, DirectoryError> {
        let not_found = || DirectoryError::from(NotFoundError::user(&request.id));
        let user_id = request.id.parse::<UserId>().map_err(|_| not_found())?;

        let mut tables = self.store.write();
        let current = tables.get(&user_id).ok_or_else(not_found)?;

        let UserPatch { username, email } = validation::validate_patch(request, current, &*tables)
            .inspect_err(|e| {
                tracing::debug!(user_id = %user_id, field_count = e.field_errors.len(), "update rejected");
            })?;

        let mut updated = current.clone();
        updated.updated_at = next_update_time(current.updated_at);
        if let Some(username) = username {
            updated.username = username;
        }
        if let Some(email) = email {
            updated.email = email;
        }
        if let Some(first_name) = &request.first_name {
            updated.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &request.last_name {
            updated.last_name.clone_from(last_name);
        }

        tables.replace(updated.clone())?;
        drop(tables);

        tracing::info!(user_id = %user_id, "user updated");
        Ok(updated)
    }

    /// Check an email's format and availability.
    #[must_use]
    pub fn validate_email(&self, email: &str) -> EmailCheck {
        let is_valid = Email::is_well_formed(email);
        let is_available = self
            .store
            .read()
            .email_owner(&Email::normalize(email))
            .is_none();

        let message = match (is_valid, is_available) {
            (false, _) => "Invalid email format",
            (true, false) => "Email is already taken",
            (true, true) => "Email is valid and available",
        };

        EmailCheck {
            is_valid,
            is_available,
            message: message.to_owned(),
        }
    }

    /// Check whether a username is free. No format rules apply.
    #[must_use]
    pub fn check_username(&self, username: &str) -> UsernameCheck {
        let is_available = self
            .store
            .read()
            .username_owner(&Username::normalize(username))
            .is_none();

        UsernameCheck {
            is_available,
            message: if is_available {
                "Username is available"
            } else {
                "Username is already taken"
            }
            .to_owned(),
        }
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Authentication` if the email is unknown or the
    /// password is wrong; the two cases are indistinguishable.
    pub fn authenticate(&self, request: &AuthenticateUserRequest) -> Result<User, DirectoryError> {
        let found = {
            let tables = self.store.read();
            tables
                .email_owner(&Email::normalize(&request.email))
                .and_then(|id| Some((tables.get(&id)?.clone(), tables.credential(&id)?.clone())))
        };

        let Some((user, credential)) = found else {
            let _ = self.hasher.verify(&request.password, &self.decoy);
            tracing::debug!("authentication failed");
            return Err(AuthenticationError::invalid_credentials().into());
        };

        if !self.hasher.verify(&request.password, &credential) {
            tracing::debug!("authentication failed");
            return Err(AuthenticationError::invalid_credentials().into());
        }

        tracing::info!(user_id = %user.id, "user authenticated");
        Ok(user)
    }
}

/// Timestamp for a mutation, strictly after `previous` even if the clock
/// has not moved.
fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + TimeDelta::nanoseconds(1)
    }
}
