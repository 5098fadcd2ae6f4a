use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Semantic type of a column, independent of its storage dtype.
#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }

    /// Kind implied by storage alone: numeric dtypes are numeric, the rest are labels.
    pub fn infer(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            Self::Numeric
        } else {
            Self::Categorical
        }
    }
}

/// Fill value used for numeric columns.
#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ImputeStrategy {
    #[default]
    Median,
    Mean,
}

impl ImputeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Median => "median",
            Self::Mean => "mean",
        }
    }
}

/// An ordered set of equal-length named columns, each tagged with a [`ColumnKind`].
///
/// Tables are values: every preprocessing stage borrows one and returns a new
/// one. Cloning is cheap because the underlying `DataFrame` shares its buffers.
#[derive(Clone, Debug)]
pub struct Table {
    frame: DataFrame,
    kinds: HashMap<String, ColumnKind>,
}

impl Table {
    /// Wraps a frame, inferring every column's kind from its dtype.
    pub fn new(frame: DataFrame) -> Self {
        let kinds = frame
            .get_columns()
            .iter()
            .map(|c| (c.name().to_string(), ColumnKind::infer(c.dtype())))
            .collect();
        Self { frame, kinds }
    }

    /// Rebuilds a table from a transformed frame, keeping known kinds and
    /// inferring kinds for columns that are new.
    pub(crate) fn derive(&self, frame: DataFrame) -> Self {
        let kinds = frame
            .get_columns()
            .iter()
            .map(|c| {
                let name = c.name().to_string();
                let kind = self
                    .kinds
                    .get(&name)
                    .copied()
                    .unwrap_or_else(|| ColumnKind::infer(c.dtype()));
                (name, kind)
            })
            .collect();
        Self { frame, kinds }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// # Errors
    ///
    /// Returns [`PrepError::ColumnNotFound`] for unknown names.
    pub fn kind(&self, name: &str) -> Result<ColumnKind> {
        self.kinds
            .get(name)
            .copied()
            .ok_or_else(|| PrepError::ColumnNotFound(name.to_owned()))
    }

    pub(crate) fn set_kind(&mut self, name: &str, kind: ColumnKind) -> Result<()> {
        match self.kinds.get_mut(name) {
            Some(slot) => {
                *slot = kind;
                Ok(())
            }
            None => Err(PrepError::ColumnNotFound(name.to_owned())),
        }
    }

    /// Names of categorical columns, in table order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|n| self.kinds.get(n) == Some(&ColumnKind::Categorical))
            .collect()
    }

    /// # Errors
    ///
    /// Returns [`PrepError::ColumnNotFound`] for unknown names.
    pub fn series(&self, name: &str) -> Result<&Series> {
        if !self.has_column(name) {
            return Err(PrepError::ColumnNotFound(name.to_owned()));
        }
        Ok(self.frame.column(name)?.as_materialized_series())
    }

    /// Number of missing cells in `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::ColumnNotFound`] for unknown names.
    pub fn count_missing(&self, name: &str) -> Result<usize> {
        Ok(self.series(name)?.null_count())
    }

    /// Total missing cells across all columns.
    pub fn total_missing(&self) -> usize {
        self.frame.get_columns().iter().map(Column::null_count).sum()
    }
}
