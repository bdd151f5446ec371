use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tc_core::CategoryTable;
use tracing_subscriber::EnvFilter;

use tc_cli::commands::{categories, classify, report};
use tc_cli::{Cli, Commands, Config};

/// Load config and validate the category table before any events are read.
fn load_config(config_path: Option<&Path>) -> Result<(Config, CategoryTable)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let table = config
        .category_table()
        .context("invalid category configuration")?;
    Ok((config, table))
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
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Report {
            files,
            all,
            events,
            json,
        }) => {
            let (config, table) = load_config(cli.config.as_deref())?;
            report::run(&config, &table, files, *all, *events, *json)?;
        }
        Some(Commands::Categories { json }) => {
            let (_config, table) = load_config(cli.config.as_deref())?;
            categories::run(&table, *json)?;
        }
        Some(Commands::Classify { title }) => {
            let (_config, table) = load_config(cli.config.as_deref())?;
            classify::run(&table, title)?;
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
