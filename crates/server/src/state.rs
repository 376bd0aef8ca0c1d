//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DirectoryConfig;
use crate::services::{DirectoryError, UserDirectory};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives every handler the
/// same directory instance.
#[derive(Clone)]
pub struct AppState {
    directory: Arc<UserDirectory>,
}

impl AppState {
    /// Create a new application state with an empty directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the password hashing configuration is invalid.
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        let directory = UserDirectory::new(config.password_policy, &config.hashing)?;

        Ok(Self {
            directory: Arc::new(directory),
        })
    }

    /// Get a reference to the directory.
    #[must_use]
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Get an owned handle to the directory, for blocking workers.
    #[must_use]
    pub fn directory_handle(&self) -> Arc<UserDirectory> {
        Arc::clone(&self.directory)
    }
}
