//! CLI types and command dispatch

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::Result;

/// Batch training pipeline for sensor fault detection
#[derive(Debug, Parser)]
#[command(name = "detectar", version, about)]
pub struct Cli {
    /// Workspace root holding `config/`, `artifact/`, and `saved_models/`
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full training pipeline
    Train(TrainArgs),
    /// Score a CSV file with the latest deployed model
    Predict(PredictArgs),
    /// Show the state of the model registry
    Info,
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// Directory of record collections (`<collection>.csv`); defaults to
    /// `<root>/store`
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Bucket directory artifacts are mirrored into; mirroring is skipped
    /// when omitted
    #[arg(long)]
    pub mirror: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// CSV file with the schema's feature columns
    pub input: PathBuf,

    /// Where to write the scored CSV
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Execute a parsed CLI invocation
pub fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Train(args) => commands::run_train(&cli.root, args),
        Command::Predict(args) => commands::run_predict(&cli.root, &args),
        Command::Info => commands::run_info(&cli.root),
    }
}
