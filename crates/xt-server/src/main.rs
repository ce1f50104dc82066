use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xt_core::{EntryInput, LogQuery, MemoryStore, Store};
use xt_server::commands::{log, serve, users};
use xt_server::{Cli, Commands, Config, LogAction, UsersAction};

const DEFAULT_LOG_FILTER: &str = "xt_server=info,xt_core=info,xt_db=info,tower_http=info";

/// Open the configured database, ensuring the parent directory exists.
fn open_database(config: &Config) -> Result<xt_db::Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    xt_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Serve { host, port, memory }) => {
            if let Some(host) = host {
                config.host.clone_from(host);
            }
            if let Some(port) = port {
                config.port = *port;
            }
            let store: Box<dyn Store + Send> = if *memory {
                tracing::info!("using in-memory store");
                Box::new(MemoryStore::new())
            } else {
                tracing::info!(path = %config.database_path.display(), "using database");
                Box::new(open_database(&config)?)
            };
            serve::run(&config, store)?;
        }
        Some(Commands::Users(action)) => {
            let mut db = open_database(&config)?;
            match action {
                UsersAction::Add { name } => users::add(&mut stdout, &mut db, name)?,
                UsersAction::List => users::list(&mut stdout, &db)?,
            }
        }
        Some(Commands::Log(action)) => {
            let mut db = open_database(&config)?;
            match action {
                LogAction::Add {
                    user_id,
                    description,
                    duration,
                    date,
                } => {
                    let input = EntryInput {
                        description: description.clone(),
                        duration: duration.clone(),
                        date: date.clone(),
                    };
                    log::add(&mut stdout, &mut db, user_id, &input)?;
                }
                LogAction::Show {
                    user_id,
                    from,
                    to,
                    limit,
                } => {
                    let query = LogQuery {
                        from: from.clone(),
                        to: to.clone(),
                        limit: limit.clone(),
                    };
                    log::show(&mut stdout, &db, user_id, &query)?;
                }
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
