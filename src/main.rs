//! Detectar CLI
//!
//! Entry point for the sensor-fault training pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Run a full training pipeline in the current workspace
//! detectar train --store data/collections --mirror /mnt/bucket
//!
//! # Score an uploaded CSV with the latest deployed model
//! detectar predict readings.csv --output scored.csv
//!
//! # Inspect the model registry
//! detectar info
//! ```

use clap::Parser;
use detectar::cli::{run_command, Cli};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
