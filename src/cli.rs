use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabprep::config::PipelineConfig;
use tabprep::pipeline::{run_pipeline, validate_config};

#[derive(Parser)]
#[command(
    name = "tabprep",
    about = "Impute, encode and split a tabular dataset into regression and classification tasks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the task bundle
    Run {
        /// Path to the JSON pipeline configuration
        #[arg(short, long, default_value = "pipeline.json")]
        config: PathBuf,

        /// Bundle output path, overriding `output.bundle`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a configuration without loading any data
    Validate {
        /// Path to the JSON pipeline configuration
        #[arg(short, long, default_value = "pipeline.json")]
        config: PathBuf,
    },
    /// Write a starter configuration
    Init {
        /// Where to write the configuration
        #[arg(short, long, default_value = "pipeline.json")]
        path: PathBuf,

        /// Input data file
        #[arg(long, default_value = "heart.csv")]
        input: PathBuf,

        /// Outcome column of the regression task
        #[arg(long, default_value = "chol")]
        regression_outcome: String,

        /// Outcome column of the classification task
        #[arg(long, default_value = "target")]
        classification_outcome: String,
    },
}

/// Loads the configuration named by a command, before logging is set up.
pub fn load_config(command: &Commands) -> Result<Option<PipelineConfig>> {
    match command {
        Commands::Run { config, .. } | Commands::Validate { config } => {
            let loaded = PipelineConfig::from_file(config)
                .with_context(|| format!("Failed to load {}", config.display()))?;
            Ok(Some(loaded))
        }
        Commands::Init { .. } => Ok(None),
    }
}

pub fn run_command(command: Commands, config: Option<PipelineConfig>) -> Result<()> {
    match (command, config) {
        (Commands::Run { output, .. }, Some(config)) => {
            let report = run_pipeline(&config, output.as_deref())?;
            println!("{}", report.summary());
            println!("Bundle: {}", report.bundle_path.display());
            println!("Table:  {}", report.table_path.display());
            Ok(())
        }
        (Commands::Validate { config: path }, Some(config)) => {
            let errors = validate_config(&config);
            if errors.is_empty() {
                println!("{} is valid", path.display());
                return Ok(());
            }
            for error in &errors {
                println!("  - {error}");
            }
            anyhow::bail!("{} has {} problem(s)", path.display(), errors.len())
        }
        (
            Commands::Init {
                path,
                input,
                regression_outcome,
                classification_outcome,
            },
            _,
        ) => {
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            PipelineConfig::new(input, &regression_outcome, &classification_outcome)
                .to_file(&path)?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        (_, None) => anyhow::bail!("No configuration loaded"),
    }
}
