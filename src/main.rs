//! # tabprep command-line entry point
//!
//! ```bash
//! tabprep init --input heart.csv
//! tabprep validate --config pipeline.json
//! tabprep run --config pipeline.json --output out/tasks.json
//! ```
//!
//! Logging is configured from the `logging` section of the pipeline
//! configuration; `RUST_LOG` overrides its level.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout, reason = "the CLI reports results on stdout")]

mod cli;

use anyhow::Result;
use clap::Parser as _;
use tabprep::logging;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let config = cli::load_config(&cli.command)?;
    let log_options = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    logging::init(&log_options)?;

    cli::run_command(cli.command, config)
}
