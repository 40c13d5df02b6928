//! # DecisionLog Shared Library
//!
//! This crate contains the types, persistence code and business rules used by
//! the DecisionLog API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pool and migrations
//! - `bot`: Keyword rule engine behind the assistant endpoint

pub mod auth;
pub mod bot;
pub mod db;
pub mod models;

/// Current version of the DecisionLog shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
