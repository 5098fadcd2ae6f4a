use super::split::{Split, random_split, stratified_split};
use super::types::Table;
use crate::error::{PrepError, Result, ResultExt as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Regression,
    Classification,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regression => "regression",
            Self::Classification => "classification",
        }
    }
}

/// A learning task over a shared prepared table.
///
/// The table is held by reference count; a task only adds the outcome, the
/// covariates and the train/test rows.
#[derive(Clone, Debug)]
pub struct Task {
    pub id: String,
    pub kind: TaskKind,
    pub table: Arc<Table>,
    pub outcome: String,
    pub covariates: Vec<String>,
    pub split: Split,
}

impl Task {
    fn covariates(table: &Table, outcome: &str) -> Result<Vec<String>> {
        if !table.has_column(outcome) {
            return Err(PrepError::ColumnNotFound(outcome.to_owned()));
        }
        Ok(table
            .column_names()
            .into_iter()
            .filter(|name| name != outcome)
            .collect())
    }

    /// Regression task with a uniform random split.
    ///
    /// # Errors
    ///
    /// Fails if `outcome` is not a column or `fraction` is out of range.
    pub fn regression(
        id: impl Into<String>,
        table: Arc<Table>,
        outcome: &str,
        fraction: f64,
        seed: u64,
    ) -> Result<Self> {
        let covariates = Self::covariates(&table, outcome)?;
        let split = random_split(table.height(), fraction, seed)?;
        Ok(Self {
            id: id.into(),
            kind: TaskKind::Regression,
            table,
            outcome: outcome.to_owned(),
            covariates,
            split,
        })
    }

    /// Classification task with a split stratified on the outcome.
    ///
    /// # Errors
    ///
    /// Fails if `outcome` is not a column, has fewer than two levels, or
    /// `fraction` is out of range.
    pub fn classification(
        id: impl Into<String>,
        table: Arc<Table>,
        outcome: &str,
        fraction: f64,
        seed: u64,
    ) -> Result<Self> {
        let covariates = Self::covariates(&table, outcome)?;
        let split = stratified_split(&table, outcome, fraction, seed)?;
        Ok(Self {
            id: id.into(),
            kind: TaskKind::Classification,
            table,
            outcome: outcome.to_owned(),
            covariates,
            split,
        })
    }

    pub fn record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id.clone(),
            kind: self.kind,
            outcome: self.outcome.clone(),
            covariates: self.covariates.clone(),
            train_rows: self.split.train.clone(),
            test_rows: self.split.test.clone(),
        }
    }
}

/// Serialized form of a [`Task`]; the table is referenced by the enclosing bundle.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug)]
pub struct TaskRecord {
    pub id: String,
    pub kind: TaskKind,
    pub outcome: String,
    pub covariates: Vec<String>,
    pub train_rows: Vec<usize>,
    pub test_rows: Vec<usize>,
}

/// The persisted artifact: both tasks plus a reference to the prepared table file.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct TaskBundle {
    pub created_at: DateTime<Utc>,
    pub table_path: PathBuf,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub regression: TaskRecord,
    pub classification: TaskRecord,
}

impl TaskBundle {
    pub fn new(table_path: PathBuf, regression: &Task, classification: &Task) -> Self {
        Self {
            created_at: Utc::now(),
            table_path,
            row_count: regression.table.height(),
            columns: regression.table.column_names(),
            regression: regression.record(),
            classification: classification.record(),
        }
    }

    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a bundle.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read bundle {}", path.as_ref().display()))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write bundle {}", path.display()))
    }
}
