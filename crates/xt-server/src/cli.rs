//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Exercise tracker.
///
/// Registers users, logs exercises against them and serves the log over HTTP.
#[derive(Debug, Parser)]
#[command(name = "xt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API server.
    Serve {
        /// Address to bind (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Keep all data in memory instead of the database file.
        #[arg(long)]
        memory: bool,
    },

    /// Manage users.
    #[command(subcommand)]
    Users(UsersAction),

    /// Add to or read a user's exercise log.
    #[command(subcommand)]
    Log(LogAction),
}

/// User subcommands.
#[derive(Debug, Subcommand)]
pub enum UsersAction {
    /// Register a new user.
    Add {
        /// Display name.
        name: String,
    },
    /// List all users.
    List,
}

/// Log subcommands.
#[derive(Debug, Subcommand)]
pub enum LogAction {
    /// Log an exercise.
    Add {
        /// The user's ID.
        user_id: String,

        /// What was done.
        description: String,

        /// Duration in minutes.
        duration: String,

        /// Date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Show a user's log.
    Show {
        /// The user's ID.
        user_id: String,

        /// Earliest date to include (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,

        /// Latest date to include (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,

        /// Maximum number of entries.
        #[arg(long)]
        limit: Option<String>,
    },
}
