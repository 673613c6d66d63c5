//! Commands module - CLI command implementations.
//!
//! One module per subcommand: the long-running server, the migration
//! runner, the cron-driven sweep and the admin bootstrap.

pub mod create_admin;
pub mod migrate;
pub mod serve;
pub mod sweep;
