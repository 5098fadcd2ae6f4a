use super::naming::indicator_name;
use super::types::{ColumnKind, ImputeStrategy, Table};
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// How a column's missing cells were filled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FillMethod {
    Median,
    Mean,
    Mode,
}

impl From<ImputeStrategy> for FillMethod {
    fn from(strategy: ImputeStrategy) -> Self {
        match strategy {
            ImputeStrategy::Median => Self::Median,
            ImputeStrategy::Mean => Self::Mean,
        }
    }
}

/// One imputed column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImputationRecord {
    pub column: String,
    pub missing: usize,
    pub indicator: String,
    pub method: FillMethod,
}

fn fill_expr(name: &str, kind: ColumnKind, strategy: ImputeStrategy) -> (Expr, FillMethod) {
    match kind {
        ColumnKind::Numeric => {
            let values = col(name).cast(DataType::Float64);
            let fill = match strategy {
                ImputeStrategy::Median => values.clone().median(),
                ImputeStrategy::Mean => values.clone().mean(),
            };
            (values.fill_null(fill).alias(name), strategy.into())
        }
        // Most frequent level; the sort makes ties resolve to the smallest level.
        ColumnKind::Categorical => {
            let fill = col(name)
                .drop_nulls()
                .mode()
                .sort(SortOptions::default())
                .first();
            (col(name).fill_null(fill).alias(name), FillMethod::Mode)
        }
    }
}

/// Fills missing cells and appends a `<prefix><column>` indicator per filled column.
///
/// `columns` selects the columns to consider; an empty slice means every
/// column. Columns are processed in table order, so indicators are appended
/// in that order too. Columns without missing cells are left untouched and get
/// no indicator.
///
/// # Errors
///
/// - [`PrepError::ColumnNotFound`] for an unknown name in `columns`
/// - [`PrepError::InsufficientData`] when every cell of a column is missing
/// - [`PrepError::DuplicateColumn`] when an indicator name is already taken
pub fn impute_missing(
    table: &Table,
    columns: &[String],
    strategy: ImputeStrategy,
    prefix: &str,
) -> Result<(Table, Vec<ImputationRecord>)> {
    for name in columns {
        table.kind(name)?;
    }
    let targets: Vec<String> = table
        .column_names()
        .into_iter()
        .filter(|name| columns.is_empty() || columns.contains(name))
        .collect();

    let mut fills = Vec::new();
    let mut indicators = Vec::new();
    let mut records: Vec<ImputationRecord> = Vec::new();

    for name in &targets {
        let series = table.series(name)?;
        let missing = series.null_count();
        if missing == 0 {
            continue;
        }
        if missing == series.len() {
            return Err(PrepError::InsufficientData {
                column: name.clone(),
            });
        }

        let indicator = indicator_name(prefix, name);
        if table.has_column(&indicator) || records.iter().any(|r| r.indicator == indicator) {
            return Err(PrepError::DuplicateColumn(indicator));
        }

        let (expr, method) = fill_expr(name, table.kind(name)?, strategy);
        fills.push(expr);
        indicators.push(
            series
                .is_null()
                .into_series()
                .cast(&DataType::Int32)?
                .with_name(indicator.as_str().into()),
        );

        tracing::debug!(column = %name, missing, method = ?method, "Imputing column");
        records.push(ImputationRecord {
            column: name.clone(),
            missing,
            indicator,
            method,
        });
    }

    if records.is_empty() {
        return Ok((table.clone(), records));
    }

    let mut frame = table.frame().clone().lazy().with_columns(fills).collect()?;
    for indicator in indicators {
        frame.with_column(indicator)?;
    }

    tracing::info!(
        imputed = records.len(),
        cells = records.iter().map(|r| r.missing).sum::<usize>(),
        "Imputed missing values"
    );
    Ok((table.derive(frame), records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_method_from_strategy() {
        assert_eq!(FillMethod::from(ImputeStrategy::Median), FillMethod::Median);
        assert_eq!(FillMethod::from(ImputeStrategy::Mean), FillMethod::Mean);
    }
}
