//! # tabprep - tabular preprocessing for learning tasks
//!
//! tabprep turns a raw delimited dataset into a prepared table plus two task
//! descriptors, one for regression and one for classification.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tabprep::config::PipelineConfig;
//! use tabprep::pipeline::prepare;
//!
//! let config = PipelineConfig::from_file("pipeline.json")?;
//! let prepared = prepare(&config)?;
//! println!(
//!     "{} rows, {} columns, {} classification training rows",
//!     prepared.table.height(),
//!     prepared.table.width(),
//!     prepared.classification.split.train.len()
//! );
//! # Ok::<(), tabprep::error::PrepError>(())
//! ```
//!
//! ## Stages
//!
//! 1. **Load**: read CSV (or Parquet) with Polars and tag column kinds from
//!    the declared [`preprocess::TableSchema`].
//! 2. **Impute**: fill missing cells (median by default) and append
//!    `miss_<column>` indicators.
//! 3. **Encode**: replace categorical columns with `<column>_<level>` one-hot
//!    columns.
//! 4. **Split**: uniform split for the regression task, stratified split for
//!    the classification task, both seeded.
//!
//! Every stage borrows a [`preprocess::Table`] and returns a new one; the row
//! count never changes.
//!
//! ## Core Modules
//!
//! - [`preprocess`]: the stages and the table/task types
//! - [`pipeline`]: configuration validation and end-to-end execution
//! - [`config`]: the JSON pipeline configuration
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing subscriber setup

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod preprocess;
