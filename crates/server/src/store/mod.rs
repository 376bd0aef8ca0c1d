//! In-memory storage for directory users.
//!
//! # Tables
//!
//! - `users` - Primary records keyed by [`UserId`]
//! - `by_username` - Lower-cased username to owning [`UserId`]
//! - `by_email` - Lower-cased email to owning [`UserId`]
//! - `credentials` - Password hash per [`UserId`]
//!
//! All four live behind one lock in [`UserStore`]. Writers hold the write
//! guard from their first uniqueness check until the last insert, so the
//! indexes and primary records always agree once the guard is dropped.

pub mod users;

use thiserror::Error;

use user_directory_core::UserId;

pub use users::{UserStore, UserTables};

/// Which unique index a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueIndex {
    Username,
    Email,
}

impl std::fmt::Display for UniqueIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Username => f.write_str("username"),
            Self::Email => f.write_str("email"),
        }
    }
}

/// Errors returned by the store's commit primitives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A unique index key is already owned by another user.
    #[error("{index} already taken: {key}")]
    Conflict { index: UniqueIndex, key: String },

    /// The primary record does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// The primary key is already in use.
    #[error("duplicate user id: {0}")]
    DuplicateId(UserId),
}
