//! Domain models for the directory.

pub mod user;

pub use user::{
    AuthenticateUserRequest, CreateUserRequest, EmailCheck, UpdateUserRequest, User,
    UsernameCheck,
};
