//! CLI subcommand implementations.

pub mod log;
pub mod serve;
pub mod users;
