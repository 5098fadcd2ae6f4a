//! Pipeline execution engine.
//!
//! Runs the stages in order (load and type, impute, encode, split) and, for a
//! full run, writes the prepared table and the task bundle.

use super::validation::validate_config;
use crate::config::PipelineConfig;
use crate::error::{PrepError, Result, ResultExt as _};
use crate::preprocess::{
    ColumnKind, Encoding, ImputationRecord, Table, Task, TaskBundle, apply_schema,
    impute_missing, load_table, one_hot_encode_except, save_table,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// In-memory result of every stage.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub table: Arc<Table>,
    pub rows_before: usize,
    pub columns_before: usize,
    pub imputations: Vec<ImputationRecord>,
    pub encodings: Vec<Encoding>,
    pub regression: Task,
    pub classification: Task,
}

/// Report generated after pipeline execution
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rows_before: usize,
    pub columns_before: usize,
    pub rows_after: usize,
    pub columns_after: usize,

    /// Columns that received an imputed value and an indicator
    pub imputed_columns: Vec<String>,

    /// Categorical columns replaced by indicators
    pub encoded_columns: Vec<String>,

    pub regression_train_rows: usize,
    pub classification_train_rows: usize,

    pub bundle_path: PathBuf,
    pub table_path: PathBuf,

    pub duration: std::time::Duration,
}

impl RunReport {
    /// Create a summary message
    pub fn summary(&self) -> String {
        format!(
            "Pipeline completed: {} rows, {} -> {} columns, {} imputed, {} encoded, train rows {} (regression) / {} (classification), {:.2}s",
            self.rows_after,
            self.columns_before,
            self.columns_after,
            self.imputed_columns.len(),
            self.encoded_columns.len(),
            self.regression_train_rows,
            self.classification_train_rows,
            self.duration.as_secs_f64()
        )
    }
}

fn check_config(config: &PipelineConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        return Ok(());
    }
    Err(PrepError::Config(format!(
        "Pipeline validation failed:\n{}",
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    )))
}

/// Runs every stage in memory without writing anything.
///
/// # Errors
///
/// Fails on an invalid configuration or on the first failing stage.
pub fn prepare(config: &PipelineConfig) -> Result<Prepared> {
    check_config(config)?;

    let raw = load_table(&config.input.path, &config.input.read)?;
    let rows_before = raw.height();
    let columns_before = raw.width();

    let typed = apply_schema(raw.into_frame(), &config.schema)?;
    let (imputed, imputations) = impute_missing(
        &typed,
        &config.impute.columns,
        config.impute.strategy,
        &config.impute.indicator_prefix,
    )?;

    let regression_outcome = &config.tasks.regression.outcome;
    if imputed.kind(regression_outcome)? == ColumnKind::Categorical {
        return Err(PrepError::Schema(format!(
            "Regression outcome '{regression_outcome}' holds labels, not numbers"
        )));
    }
    // The classification outcome stays a label column.
    let classification_outcome = config.tasks.classification.outcome.clone();
    let (encoded, encodings) = one_hot_encode_except(&imputed, &[classification_outcome])?;

    if encoded.height() != rows_before {
        return Err(PrepError::DataProcessing(format!(
            "Row count changed from {rows_before} to {}",
            encoded.height()
        )));
    }

    let table = Arc::new(encoded);
    let split = config.split;
    let regression = Task::regression(
        config.tasks.regression.id.clone(),
        Arc::clone(&table),
        &config.tasks.regression.outcome,
        split.train_fraction,
        split.seed,
    )?;
    let classification = Task::classification(
        config.tasks.classification.id.clone(),
        Arc::clone(&table),
        &config.tasks.classification.outcome,
        split.train_fraction,
        split.seed,
    )?;

    tracing::info!(
        rows = table.height(),
        columns = table.width(),
        regression_train = regression.split.train.len(),
        classification_train = classification.split.train.len(),
        "Prepared tasks"
    );

    Ok(Prepared {
        table,
        rows_before,
        columns_before,
        imputations,
        encodings,
        regression,
        classification,
    })
}

/// Runs the pipeline and writes the prepared table and the task bundle.
///
/// `bundle_override` replaces `output.bundle` from the configuration.
///
/// # Errors
///
/// Fails on an invalid configuration, a failing stage or an unwritable output.
pub fn run_pipeline(config: &PipelineConfig, bundle_override: Option<&Path>) -> Result<RunReport> {
    let start = Instant::now();
    let prepared = prepare(config)?;

    let bundle_path = bundle_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.output.bundle.clone());
    let table_path = config.output.table_path_for(&bundle_path);

    save_table(&prepared.table, &table_path)
        .with_context(|| format!("Failed to write table {}", table_path.display()))?;

    // The bundle references the table relative to itself when they share a directory.
    let table_ref = match (table_path.parent(), bundle_path.parent()) {
        (Some(t), Some(b)) if t == b => table_path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| table_path.clone()),
        _ => table_path.clone(),
    };
    TaskBundle::new(table_ref, &prepared.regression, &prepared.classification)
        .write(&bundle_path)?;

    let report = RunReport {
        rows_before: prepared.rows_before,
        columns_before: prepared.columns_before,
        rows_after: prepared.table.height(),
        columns_after: prepared.table.width(),
        imputed_columns: prepared
            .imputations
            .iter()
            .map(|r| r.column.clone())
            .collect(),
        encoded_columns: prepared
            .encodings
            .iter()
            .map(|e| e.column.clone())
            .collect(),
        regression_train_rows: prepared.regression.split.train.len(),
        classification_train_rows: prepared.classification.split.train.len(),
        bundle_path,
        table_path,
        duration: start.elapsed(),
    };
    tracing::info!("{}", report.summary());
    Ok(report)
}
