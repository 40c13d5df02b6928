/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded migration runner
///
/// Models and their queries live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
