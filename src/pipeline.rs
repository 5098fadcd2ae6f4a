//! Configuration-driven execution of the preprocessing stages.
//!
//! # Example
//!
//! ```no_run
//! use tabprep::config::PipelineConfig;
//! use tabprep::pipeline::run_pipeline;
//!
//! let config = PipelineConfig::from_file("pipeline.json")?;
//! let report = run_pipeline(&config, None)?;
//! println!("{}", report.summary());
//! # Ok::<(), tabprep::error::PrepError>(())
//! ```

pub mod executor;
pub mod validation;

pub use executor::{Prepared, RunReport, prepare, run_pipeline};
pub use validation::{ValidationError, validate_config};
