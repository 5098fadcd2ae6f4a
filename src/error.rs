//! Centralized error handling for tabprep.
//!
//! Every preprocessing stage returns [`Result<T>`], whose error side is the
//! [`PrepError`] enum. Callers can match on the variant to tell a bad column
//! reference apart from data that cannot be imputed or stratified:
//!
//! ```
//! use tabprep::error::PrepError;
//!
//! fn describe(err: &PrepError) -> &'static str {
//!     match err {
//!         PrepError::ColumnNotFound(_) => "fix the configuration",
//!         PrepError::InsufficientData { .. } => "drop or fill the column upstream",
//!         PrepError::InvalidStratificationTarget { .. } => "pick another outcome",
//!         _ => "inspect the log",
//!     }
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! [`ResultExt`] adds `.context()` to any `Result` whose error converts into
//! [`PrepError`]:
//!
//! ```no_run
//! use tabprep::error::ResultExt as _;
//!
//! fn read_input() -> tabprep::error::Result<String> {
//!     std::fs::read_to_string("heart.csv").context("Failed to read input")
//! }
//! ```

use std::fmt;

/// Main error type for preprocessing operations.
#[derive(Debug)]
pub enum PrepError {
    /// I/O errors (reading input, writing the bundle)
    Io(std::io::Error),

    /// A referenced column does not exist in the table
    ColumnNotFound(String),

    /// A column has no observed values to compute a fill value from
    InsufficientData { column: String },

    /// Stratification needs at least two observed outcome levels
    InvalidStratificationTarget { column: String, levels: usize },

    /// Split fraction outside the open interval (0, 1)
    InvalidFraction(f64),

    /// A derived column would overwrite an existing one
    DuplicateColumn(String),

    /// Table does not match the declared schema
    Schema(String),

    /// Configuration errors
    Config(String),

    /// Data processing errors (Polars, parsing, etc.)
    DataProcessing(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ColumnNotFound(name) => write!(f, "Column not found: '{name}'"),
            Self::InsufficientData { column } => write!(
                f,
                "Insufficient data: column '{column}' has no observed values"
            ),
            Self::InvalidStratificationTarget { column, levels } => write!(
                f,
                "Invalid stratification target: column '{column}' has {levels} observed level(s), at least 2 required"
            ),
            Self::InvalidFraction(fraction) => {
                write!(f, "Invalid split fraction {fraction}: must lie strictly between 0 and 1")
            }
            Self::DuplicateColumn(name) => write!(f, "Column already exists: '{name}'"),
            Self::Schema(msg) => write!(f, "Schema error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PrepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PrepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for PrepError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for preprocessing operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Errors
    ///
    /// Returns the original error, wrapped with `msg`.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    ///
    /// # Errors
    ///
    /// Returns the original error, wrapped with the closure's message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrepError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", f(), err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrepError::ColumnNotFound("oldpeak".to_owned());
        assert_eq!(err.to_string(), "Column not found: 'oldpeak'");

        let err = PrepError::InvalidStratificationTarget {
            column: "target".to_owned(),
            levels: 1,
        };
        assert!(err.to_string().contains("1 observed level(s)"));
    }

    #[test]
    fn test_polars_error_maps_to_data_processing() {
        let err: PrepError =
            polars::error::PolarsError::ComputeError("bad cast".into()).into();
        assert!(matches!(err, PrepError::DataProcessing(_)));
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "heart.csv",
        ));

        let result: Result<()> = result.context("Failed to read input");
        assert!(
            result
                .expect_err("context keeps the error")
                .to_string()
                .contains("Failed to read input")
        );
    }
}
