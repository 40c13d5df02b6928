/// Middleware for the API server
///
/// - `auth`: Bearer token gate in front of protected routers
/// - `security`: Hardening response headers

pub mod auth;
pub mod security;
