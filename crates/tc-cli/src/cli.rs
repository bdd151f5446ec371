//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Weekly calendar time report.
///
/// Sorts the week's calendar events into categories by title keywords and
/// compares the hours spent against each category's weekly target.
#[derive(Debug, Parser)]
#[command(name = "tc", version, about, long_about = None)]
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
    /// Report hours per category for the current week.
    Report {
        /// Calendar event list files (JSON). Reads stdin when none are given
        /// here or in the config.
        files: Vec<PathBuf>,

        /// Include events outside the current week.
        #[arg(long)]
        all: bool,

        /// List the events counted in each category.
        #[arg(long)]
        events: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List configured categories and their weekly targets.
    Categories {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show which categories an event title would fall into.
    Classify {
        /// The event title.
        title: String,
    },
}
