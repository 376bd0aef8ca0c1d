//! User tables and the lock that guards them.

use std::collections::HashMap;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use user_directory_core::{StoredCredential, UserId};

use super::{StoreError, UniqueIndex};
use crate::models::User;

/// Shared, lock-guarded user storage.
#[derive(Debug, Default)]
pub struct UserStore {
    tables: RwLock<UserTables>,
}

impl UserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire shared access.
    pub fn read(&self) -> RwLockReadGuard<'_, UserTables> {
        self.tables.read()
    }

    /// Acquire exclusive access for a check-then-commit sequence.
    pub fn write(&self) -> RwLockWriteGuard<'_, UserTables> {
        self.tables.write()
    }
}

/// The four associative structures of the directory.
#[derive(Debug, Default)]
pub struct UserTables {
    users: HashMap<UserId, User>,
    by_username: HashMap<String, UserId>,
    by_email: HashMap<String, UserId>,
    credentials: HashMap<UserId, StoredCredential>,
}

impl UserTables {
    /// Get a user by ID.
    #[must_use]
    pub fn get(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// Owner of a normalized username key.
    #[must_use]
    pub fn username_owner(&self, key: &str) -> Option<UserId> {
        self.by_username.get(key).copied()
    }

    /// Owner of a normalized email key.
    #[must_use]
    pub fn email_owner(&self, key: &str) -> Option<UserId> {
        self.by_email.get(key).copied()
    }

    /// Stored credential for a user.
    #[must_use]
    pub fn credential(&self, id: &UserId) -> Option<&StoredCredential> {
        self.credentials.get(id)
    }

    /// Number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store holds no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Insert a new user, both index entries, and the credential.
    ///
    /// Every key is checked before anything is written, so on error no table
    /// has changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateId` if the ID exists and
    /// `StoreError::Conflict` if either normalized key is already owned.
    pub fn insert(&mut self, user: User, credential: StoredCredential) -> Result<(), StoreError> {
        if self.users.contains_key(&user.id) {
            return Err(StoreError::DuplicateId(user.id));
        }

        let username_key = user.username.normalized();
        if self.by_username.contains_key(&username_key) {
            return Err(StoreError::Conflict {
                index: UniqueIndex::Username,
                key: username_key,
            });
        }

        let email_key = user.email.normalized();
        if self.by_email.contains_key(&email_key) {
            return Err(StoreError::Conflict {
                index: UniqueIndex::Email,
                key: email_key,
            });
        }

        let id = user.id;
        self.by_username.insert(username_key, id);
        self.by_email.insert(email_key, id);
        self.credentials.insert(id, credential);
        self.users.insert(id, user);
        Ok(())
    }

    /// Replace an existing user's record, moving index entries whose
    /// normalized key changed.
    ///
    /// A new key may already belong to the same user (for a case-only
    /// change), but not to anyone else. All checks run before any write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user does not exist and
    /// `StoreError::Conflict` if a new key is owned by another user.
    pub fn replace(&mut self, user: User) -> Result<(), StoreError> {
        let current = self.users.get(&user.id).ok_or(StoreError::NotFound(user.id))?;

        let old_username = current.username.normalized();
        let new_username = user.username.normalized();
        let old_email = current.email.normalized();
        let new_email = user.email.normalized();

        if let Some(owner) = self.by_username.get(&new_username)
            && *owner != user.id
        {
            return Err(StoreError::Conflict {
                index: UniqueIndex::Username,
                key: new_username,
            });
        }

        if let Some(owner) = self.by_email.get(&new_email)
            && *owner != user.id
        {
            return Err(StoreError::Conflict {
                index: UniqueIndex::Email,
                key: new_email,
            });
        }

        if old_username != new_username {
            self.by_username.remove(&old_username);
            self.by_username.insert(new_username, user.id);
        }
        if old_email != new_email {
            self.by_email.remove(&old_email);
            self.by_email.insert(new_email, user.id);
        }
        self.users.insert(user.id, user);
        Ok(())
    }
}
