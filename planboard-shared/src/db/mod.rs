/// Database layer for Planboard
///
/// - `pool`: SQLite connection pool with foreign keys enabled
/// - `migrations`: embedded schema migrations
///
/// Models are in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
