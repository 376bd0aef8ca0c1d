//! User Directory server library.
//!
//! This crate provides the directory service and its HTTP surface as a
//! library, allowing it to be tested and embedded.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
