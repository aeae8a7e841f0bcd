use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bt_cli::commands::{add, day, edit, events, stats, status, tap};
use bt_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<bt_db::Database> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = bt_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok(db)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let now_ms = Utc::now().timestamp_millis();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Status) => {
            let db = open_database(cli.config.as_deref())?;
            status::run(&mut out, &db, now_ms)?;
        }
        Some(Commands::Stats { period, json }) => {
            let db = open_database(cli.config.as_deref())?;
            stats::run(&mut out, &db, *period, *json, now_ms)?;
        }
        Some(Commands::Day { date, json }) => {
            let db = open_database(cli.config.as_deref())?;
            day::run(&mut out, &db, *date, *json, now_ms)?;
        }
        Some(Commands::Tap { kind, author }) => {
            let db = open_database(cli.config.as_deref())?;
            tap::run(&mut out, &db, *kind, author.as_deref(), now_ms)?;
        }
        Some(Commands::Add {
            kind,
            ago,
            at,
            duration,
            author,
        }) => {
            let db = open_database(cli.config.as_deref())?;
            add::run(
                &mut out,
                &db,
                *kind,
                *ago,
                *at,
                *duration,
                author.as_deref(),
                now_ms,
            )?;
        }
        Some(Commands::Events { after, before }) => {
            let db = open_database(cli.config.as_deref())?;
            events::run(&mut out, &db, *after, *before)?;
        }
        Some(Commands::Delete { at }) => {
            let db = open_database(cli.config.as_deref())?;
            edit::delete(&mut out, &db, *at)?;
        }
        Some(Commands::Retype { at, kind }) => {
            let db = open_database(cli.config.as_deref())?;
            edit::retype(&mut out, &db, *at, *kind)?;
        }
        Some(Commands::Reschedule { at, to }) => {
            let db = open_database(cli.config.as_deref())?;
            edit::reschedule(&mut out, &db, *at, *to)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
