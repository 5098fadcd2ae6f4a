//! Explicit column typing.
//!
//! Integer-coded fields such as chest-pain type look numeric on disk. A
//! [`TableSchema`] declares up front which columns are categorical, and
//! [`apply_schema`] checks the declaration against the loaded frame before any
//! transformation runs.

use super::types::{ColumnKind, Table};
use crate::error::{PrepError, Result};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// How undeclared columns are treated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMatchMode {
    /// Undeclared columns are kept with a kind inferred from storage
    #[default]
    Tolerant,

    /// Every column must be declared
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
        }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TableSchema {
    #[serde(default)]
    pub match_mode: SchemaMatchMode,

    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    pub fn categorical_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Categorical)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn declared_kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }
}

/// Reclassifies `columns` as categorical without touching their values.
///
/// # Errors
///
/// Returns [`PrepError::ColumnNotFound`] if any name is absent.
pub fn mark_categorical(table: &Table, columns: &[String]) -> Result<Table> {
    let mut out = table.clone();
    for name in columns {
        out.set_kind(name, ColumnKind::Categorical)?;
        tracing::debug!(column = %name, "Marked column as categorical");
    }
    Ok(out)
}

/// Validates `frame` against `schema` and tags each column with its kind.
///
/// # Errors
///
/// - [`PrepError::ColumnNotFound`] for a declared column missing from the frame
/// - [`PrepError::Schema`] for a numeric declaration over non-numeric storage,
///   or an undeclared column in strict mode
pub fn apply_schema(frame: DataFrame, schema: &TableSchema) -> Result<Table> {
    let table = Table::new(frame);

    for spec in &schema.columns {
        let series = table.series(&spec.name)?;
        if spec.kind == ColumnKind::Numeric && !series.dtype().is_primitive_numeric() {
            return Err(PrepError::Schema(format!(
                "Column '{}' is declared numeric but holds {}",
                spec.name,
                series.dtype()
            )));
        }
    }

    if schema.match_mode == SchemaMatchMode::Strict {
        let undeclared: Vec<String> = table
            .column_names()
            .into_iter()
            .filter(|name| schema.declared_kind(name).is_none())
            .collect();
        if !undeclared.is_empty() {
            return Err(PrepError::Schema(format!(
                "Undeclared columns in strict mode: {}",
                undeclared.join(", ")
            )));
        }
    }

    // Declared numeric columns were checked above, so inference already agrees.
    mark_categorical(&table, &schema.categorical_names())
}

#[cfg(test)]
mod tests {
    #![expect(clippy::unwrap_used, reason = "tests fail loudly on unexpected shapes")]

    use super::*;
    use polars::prelude::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::from(Series::new("age".into(), vec![63i64, 37, 41])),
            Column::from(Series::new("cp".into(), vec![1i64, 3, 2])),
            Column::from(Series::new("sex".into(), vec!["m", "f", "f"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_tolerant_schema_infers_undeclared() {
        let schema = TableSchema {
            match_mode: SchemaMatchMode::Tolerant,
            columns: vec![ColumnSpec::categorical("cp")],
        };
        let table = apply_schema(frame(), &schema).unwrap();
        assert_eq!(table.kind("age").unwrap(), ColumnKind::Numeric);
        assert_eq!(table.kind("cp").unwrap(), ColumnKind::Categorical);
        assert_eq!(table.kind("sex").unwrap(), ColumnKind::Categorical);
    }

    #[test]
    fn test_strict_schema_rejects_undeclared() {
        let schema = TableSchema {
            match_mode: SchemaMatchMode::Strict,
            columns: vec![ColumnSpec::numeric("age"), ColumnSpec::categorical("cp")],
        };
        let err = apply_schema(frame(), &schema).unwrap_err();
        assert!(matches!(err, PrepError::Schema(ref msg) if msg.contains("sex")));
    }

    #[test]
    fn test_numeric_declaration_over_text_fails() {
        let schema = TableSchema {
            match_mode: SchemaMatchMode::Tolerant,
            columns: vec![ColumnSpec::numeric("sex")],
        };
        assert!(matches!(
            apply_schema(frame(), &schema),
            Err(PrepError::Schema(_))
        ));
    }

    #[test]
    fn test_unknown_declared_column() {
        let schema = TableSchema {
            match_mode: SchemaMatchMode::Tolerant,
            columns: vec![ColumnSpec::categorical("thal")],
        };
        assert!(matches!(
            apply_schema(frame(), &schema),
            Err(PrepError::ColumnNotFound(ref name)) if name == "thal"
        ));
    }

    #[test]
    fn test_mark_categorical_keeps_values() {
        let table = Table::new(frame());
        let marked = mark_categorical(&table, &["cp".to_owned()]).unwrap();
        assert_eq!(marked.kind("cp").unwrap(), ColumnKind::Categorical);
        assert!(marked.frame().equals(table.frame()));

        let err = mark_categorical(&table, &["nope".to_owned()]).unwrap_err();
        assert!(matches!(err, PrepError::ColumnNotFound(_)));
    }
}
