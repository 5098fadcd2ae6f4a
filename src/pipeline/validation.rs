//! Static checks on a pipeline configuration.
//!
//! These run before any data is loaded, so a bad configuration is reported in
//! full instead of failing one stage at a time. Checks that need the data
//! (column existence, observed levels) happen in the stages themselves.

use crate::config::{CONFIG_VERSION, PipelineConfig, TaskConfig};
use crate::preprocess::ColumnKind;
use std::collections::HashSet;

/// Validation error with helpful context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub section: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(section: &'static str, message: impl Into<String>) -> Self {
        Self {
            section,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.section, self.message)
    }
}

/// Collects every problem found in `config`; empty means valid.
pub fn validate_config(config: &PipelineConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.version != CONFIG_VERSION {
        errors.push(ValidationError::new(
            "version",
            format!(
                "Unsupported config version '{}', expected '{CONFIG_VERSION}'",
                config.version
            ),
        ));
    }

    if let Err(e) = config.input.read.separator() {
        errors.push(ValidationError::new("input", e.to_string()));
    }

    let mut declared = HashSet::new();
    for spec in &config.schema.columns {
        if !declared.insert(spec.name.as_str()) {
            errors.push(ValidationError::new(
                "schema",
                format!("Column '{}' is declared more than once", spec.name),
            ));
        }
    }

    if config.impute.indicator_prefix.is_empty() {
        errors.push(ValidationError::new(
            "impute",
            "Indicator prefix must not be empty",
        ));
    }

    let fraction = config.split.train_fraction;
    if !(fraction.is_finite() && fraction > 0.0 && fraction < 1.0) {
        errors.push(ValidationError::new(
            "split",
            format!("Train fraction {fraction} must lie strictly between 0 and 1"),
        ));
    }

    validate_task(&config.tasks.regression, &mut errors);
    validate_task(&config.tasks.classification, &mut errors);
    let regression = &config.tasks.regression;
    if config.schema.declared_kind(&regression.outcome) == Some(ColumnKind::Categorical) {
        errors.push(ValidationError::new(
            "tasks",
            format!(
                "Outcome '{}' of regression task '{}' is declared categorical",
                regression.outcome, regression.id
            ),
        ));
    }
    if config.tasks.regression.id == config.tasks.classification.id {
        errors.push(ValidationError::new(
            "tasks",
            format!("Task id '{}' is used twice", config.tasks.regression.id),
        ));
    }

    errors
}

fn validate_task(task: &TaskConfig, errors: &mut Vec<ValidationError>) {
    if task.id.trim().is_empty() {
        errors.push(ValidationError::new("tasks", "Task id must not be empty"));
    }
    if task.outcome.trim().is_empty() {
        errors.push(ValidationError::new(
            "tasks",
            format!("Task '{}' has no outcome column", task.id),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::ColumnSpec;

    fn config() -> PipelineConfig {
        PipelineConfig::new("heart.csv", "chol", "target")
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&config()).is_empty());
    }

    #[test]
    fn test_collects_every_problem() {
        let mut config = config();
        config.version = "9.9".to_owned();
        config.split.train_fraction = 1.0;
        config.impute.indicator_prefix = String::new();
        config.tasks.classification.id = config.tasks.regression.id.clone();

        let errors = validate_config(&config);
        let sections: Vec<&str> = errors.iter().map(|e| e.section).collect();
        assert_eq!(sections, vec!["version", "impute", "split", "tasks"]);
    }

    #[test]
    fn test_categorical_regression_outcome_rejected() {
        let mut config = config();
        config.schema.columns.push(ColumnSpec::categorical("chol"));

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors.iter().all(|e| e.to_string().contains("declared categorical")));
    }

    #[test]
    fn test_categorical_classification_outcome_allowed() {
        let mut config = config();
        config.schema.columns.push(ColumnSpec::categorical("target"));
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let mut config = config();
        config.schema.columns.push(ColumnSpec::categorical("cp"));
        config.schema.columns.push(ColumnSpec::numeric("cp"));

        let errors = validate_config(&config);
        assert_eq!(errors.first().map(|e| e.section), Some("schema"));
    }
}
