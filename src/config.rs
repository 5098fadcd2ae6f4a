//! Pipeline configuration.
//!
//! A run is described by one JSON document:
//!
//! ```json
//! {
//!   "version": "0.1",
//!   "name": "heart",
//!   "input": { "path": "data/heart.csv", "null_values": ["?"] },
//!   "schema": { "columns": [ { "name": "cp", "kind": "categorical" } ] },
//!   "impute": { "strategy": "median", "indicator_prefix": "miss_" },
//!   "split": { "train_fraction": 0.7, "seed": 123 },
//!   "tasks": {
//!     "regression": { "id": "heart-chol", "outcome": "chol" },
//!     "classification": { "id": "heart-target", "outcome": "target" }
//!   },
//!   "output": { "bundle": "out/heart_tasks.json" }
//! }
//! ```
//!
//! Every section except `input.path` and the task outcomes has defaults.

use crate::error::{PrepError, Result, ResultExt as _};
use crate::logging::LogOptions;
use crate::preprocess::{ImputeStrategy, ReadOptions, TableSchema};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current configuration format version
pub const CONFIG_VERSION: &str = "0.1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_name")]
    pub name: String,

    pub input: InputConfig,

    #[serde(default)]
    pub schema: TableSchema,

    #[serde(default)]
    pub impute: ImputeConfig,

    #[serde(default)]
    pub split: SplitConfig,

    pub tasks: TasksConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LogOptions,
}

fn default_version() -> String {
    CONFIG_VERSION.to_owned()
}

fn default_name() -> String {
    "tabprep".to_owned()
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>, regression_outcome: &str, classification_outcome: &str) -> Self {
        Self {
            version: default_version(),
            name: default_name(),
            input: InputConfig {
                path: input.into(),
                read: ReadOptions::default(),
            },
            schema: TableSchema::default(),
            impute: ImputeConfig::default(),
            split: SplitConfig::default(),
            tasks: TasksConfig {
                regression: TaskConfig {
                    id: "regression".to_owned(),
                    outcome: regression_outcome.to_owned(),
                },
                classification: TaskConfig {
                    id: "classification".to_owned(),
                    outcome: classification_outcome.to_owned(),
                },
            },
            output: OutputConfig::default(),
            logging: LogOptions::default(),
        }
    }

    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config = Self::from_json(&content)?;
        config.resolve_relative_to(path.parent().unwrap_or_else(|| Path::new("")));
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails on malformed JSON or missing required fields.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PrepError::Config(format!("Failed to parse pipeline config: {e}")))
    }

    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).context("Failed to write pipeline config")
    }

    /// # Errors
    ///
    /// Fails if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Makes relative input/output paths relative to the config file's directory.
    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() && !base.as_os_str().is_empty() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.input.path);
        resolve(&mut self.output.bundle);
        if let Some(table) = self.output.table.as_mut() {
            resolve(table);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: PathBuf,

    #[serde(flatten)]
    pub read: ReadOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputeConfig {
    /// Columns to impute; empty means every column with missing cells
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub strategy: ImputeStrategy,

    #[serde(default = "default_indicator_prefix")]
    pub indicator_prefix: String,
}

fn default_indicator_prefix() -> String {
    "miss_".to_owned()
}

impl Default for ImputeConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            strategy: ImputeStrategy::Median,
            indicator_prefix: default_indicator_prefix(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_train_fraction() -> f64 {
    0.7
}

fn default_seed() -> u64 {
    123
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_fraction: default_train_fraction(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    pub regression: TaskConfig,
    pub classification: TaskConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    pub outcome: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Bundle JSON path
    #[serde(default = "default_bundle")]
    pub bundle: PathBuf,

    /// Prepared table path; next to the bundle as `<stem>.table.csv` when unset
    #[serde(default)]
    pub table: Option<PathBuf>,
}

fn default_bundle() -> PathBuf {
    PathBuf::from("tasks.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bundle: default_bundle(),
            table: None,
        }
    }
}

impl OutputConfig {
    pub fn table_path_for(&self, bundle: &Path) -> PathBuf {
        match &self.table {
            Some(path) => path.clone(),
            None => {
                let stem = bundle
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "tasks".to_owned());
                bundle.with_file_name(format!("{stem}.table.csv"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::ColumnKind;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let json = r#"{
            "input": { "path": "heart.csv" },
            "schema": { "columns": [ { "name": "cp", "kind": "categorical" } ] },
            "tasks": {
                "regression": { "id": "reg", "outcome": "chol" },
                "classification": { "id": "clf", "outcome": "target" }
            }
        }"#;
        let config = PipelineConfig::from_json(json).expect("valid config");

        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.input.read.delimiter, ",");
        assert!(config.input.read.null_values.contains(&"?".to_owned()));
        assert_eq!(config.schema.declared_kind("cp"), Some(ColumnKind::Categorical));
        assert_eq!(config.impute.strategy, ImputeStrategy::Median);
        assert_eq!(config.impute.indicator_prefix, "miss_");
        assert!((config.split.train_fraction - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.output.bundle, PathBuf::from("tasks.json"));
    }

    #[test]
    fn test_missing_tasks_is_config_error() {
        let err = PipelineConfig::from_json(r#"{ "input": { "path": "x.csv" } }"#)
            .expect_err("tasks are required");
        assert!(matches!(err, PrepError::Config(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let config = PipelineConfig::new("heart.csv", "chol", "target");
        let back = PipelineConfig::from_json(&config.to_json().expect("serializes"))
            .expect("parses");
        assert_eq!(back.tasks.classification.outcome, "target");
        assert_eq!(back.input.path, PathBuf::from("heart.csv"));
    }

    #[test]
    fn test_default_table_path_sits_next_to_bundle() {
        let output = OutputConfig::default();
        assert_eq!(
            output.table_path_for(Path::new("out/heart.json")),
            PathBuf::from("out/heart.table.csv")
        );
    }

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pipeline.json");
        PipelineConfig::new("heart.csv", "chol", "target")
            .to_file(&path)
            .expect("written");

        let config = PipelineConfig::from_file(&path).expect("read back");
        assert_eq!(config.input.path, dir.path().join("heart.csv"));
        assert_eq!(config.output.bundle, dir.path().join("tasks.json"));
    }
}
