//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the pipeline configuration (env + flags)
//! - runs the requested stage(s)
//! - turns stage failures into an exit code when `--strict` is set

use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, RunArgs};
use crate::data::{PageSource, ScryfallClient};
use crate::domain::{PipelineConfig, Stage};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mtg-etl` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    crate::logging::init("info");

    let args = cli.command.args().clone();
    let config = config_from_args(PipelineConfig::from_env()?, &args);

    match cli.command {
        Command::Run(_) => handle_run(&config, args.strict),
        Command::Bronze(_) => handle_stage(&config, Stage::Bronze, args.strict),
        Command::Silver(_) => handle_stage(&config, Stage::Silver, args.strict),
        Command::Gold(_) => handle_stage(&config, Stage::Gold, args.strict),
    }
}

fn handle_run(config: &PipelineConfig, strict: bool) -> Result<(), AppError> {
    let client = ScryfallClient::new(config)?;
    let report = pipeline::run_all(config, &client);

    match report.first_error() {
        Some(err) if strict => Err(AppError::new(err.exit_code(), err.to_string())),
        _ => Ok(()),
    }
}

fn handle_stage(config: &PipelineConfig, stage: Stage, strict: bool) -> Result<(), AppError> {
    let client = ScryfallClient::new(config)?;
    let source: &dyn PageSource = &client;

    match pipeline::run_stage(config, stage, source) {
        Err(err) if strict => Err(err.into()),
        _ => Ok(()),
    }
}

/// Apply CLI overrides on top of the environment-derived configuration.
pub fn config_from_args(mut config: PipelineConfig, args: &RunArgs) -> PipelineConfig {
    if let Some(set) = &args.set_code {
        config.set_code = set.clone();
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(ms) = args.page_delay_ms {
        config.page_delay = Duration::from_millis(ms);
    }
    config
}

/// Rewrite argv so `mtg-etl` defaults to `mtg-etl run`.
///
/// Rules:
/// - `mtg-etl`                       -> `mtg-etl run`
/// - `mtg-etl --set neo ...`         -> `mtg-etl run --set neo ...`
/// - `mtg-etl --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "bronze" | "silver" | "gold");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}
