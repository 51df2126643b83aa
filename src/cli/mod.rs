//! Command-line parsing for the card ETL.
//!
//! Every flag is optional: `mtg-etl` with no arguments runs the full pipeline
//! with the configuration taken from the environment.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mtg-etl", version, about = "Card set ETL: search API -> bronze JSON -> silver CSV -> gold SQLite")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run bronze, silver and gold in order (default).
    Run(RunArgs),
    /// Fetch the collection and write the bronze JSON.
    Bronze(RunArgs),
    /// Refine the bronze JSON into the silver CSV.
    Silver(RunArgs),
    /// Aggregate the silver CSV and load the warehouse.
    Gold(RunArgs),
}

/// Options shared by every subcommand. Unset flags fall back to `MTG_ETL_*`.
#[derive(Debug, Args, Clone, Default)]
pub struct RunArgs {
    /// Collection code to fetch (e.g. mh3).
    #[arg(short = 's', long = "set")]
    pub set_code: Option<String>,

    /// Directory holding the bronze/, silver/ and gold/ layers.
    #[arg(short = 'd', long)]
    pub data_dir: Option<PathBuf>,

    /// Pause between paginated requests, in milliseconds.
    #[arg(long)]
    pub page_delay_ms: Option<u64>,

    /// Exit non-zero when any stage fails.
    #[arg(long)]
    pub strict: bool,
}

impl Command {
    pub fn args(&self) -> &RunArgs {
        match self {
            Command::Run(args) | Command::Bronze(args) | Command::Silver(args) | Command::Gold(args) => args,
        }
    }
}
