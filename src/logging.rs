//! Logging setup for the `tabprep` binary.
//!
//! Logs always go to the console. When file logging is enabled they are also
//! written to a daily-rotated `tabprep.<date>.log` in the app data directory.
//!
//! ```no_run
//! use tabprep::logging::{self, LogOptions};
//!
//! logging::init(&LogOptions::default()).expect("Failed to initialize logging");
//! tracing::info!("Pipeline started");
//! ```

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Logging section of the pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogOptions {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Also write rotating log files
    #[serde(default)]
    pub to_file: bool,

    /// Directory for log files; platform data dir when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_owned()
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: default_level(),
            to_file: false,
            dir: None,
        }
    }
}

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/tabprep/logs`
/// - macOS: `~/Library/Application Support/tabprep/logs`
/// - Linux: `~/.local/share/tabprep/logs`
///
/// # Errors
///
/// Returns error if no data directory is known or it cannot be created.
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    let log_dir = base_dir.join("tabprep").join("logs");
    ensure_dir(log_dir)
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initializes the global subscriber.
///
/// # Errors
///
/// Returns error if the filter directive is invalid or the log directory
/// cannot be prepared.
pub fn init(options: &LogOptions) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.level))
        .context("Failed to create env filter")?;

    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .compact();

    let file_layer = if options.to_file {
        let log_dir = match &options.dir {
            Some(dir) => ensure_dir(dir.clone())?,
            None => get_log_dir()?,
        };
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("tabprep")
            .filename_suffix("log")
            .build(&log_dir)
            .context("Failed to create log file appender")?;
        Some(
            fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(appender)
                .boxed(),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
