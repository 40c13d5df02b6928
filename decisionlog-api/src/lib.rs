//! # DecisionLog API Server Library
//!
//! HTTP layer of DecisionLog: a shared log of decisions with tags, comments,
//! votes, teams, chat and whiteboards.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors that reject with `ApiError`
//! - `middleware`: JWT gate and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
