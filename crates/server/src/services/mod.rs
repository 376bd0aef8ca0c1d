//! Business logic services.
//!
//! Services sit between the RPC routes and the in-memory store. Route
//! handlers decode a request, call one service method, and encode its result.

pub mod directory;

pub use directory::{DirectoryError, UserDirectory};
