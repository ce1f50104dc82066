//! Exercise tracker server and CLI library.
//!
//! This crate provides the HTTP API, configuration loading and the `xt`
//! command-line interface.

pub mod api;
mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, LogAction, UsersAction};
pub use config::Config;
