//! User Directory Core - Shared identity types.
//!
//! This crate provides the validated types used by the user directory:
//! - `server` - In-memory directory service and its JSON RPC surface
//! - `integration-tests` - End-to-end tests against a running server
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no locking, no hashing.
//! Parsing rules for usernames and emails live here so that every layer
//! agrees on what a valid value and its normalized index key look like.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for user IDs, usernames, emails, and stored credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
