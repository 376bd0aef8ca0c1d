//! Core types for the user directory.
//!
//! This module provides type-safe wrappers for identity concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod username;

pub use credential::StoredCredential;
pub use email::{Email, EmailError};
pub use id::*;
pub use username::{Username, UsernameError};
