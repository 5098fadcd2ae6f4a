use super::naming::level_column_names;
use super::types::Table;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// The indicator columns produced for one categorical column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Encoding {
    pub column: String,
    pub levels: Vec<String>,
    pub indicators: Vec<String>,
}

/// Distinct observed values of `series` in ascending natural order, as labels.
///
/// Sorting happens on the stored dtype, so integer codes order numerically
/// (`2` before `10`) while text orders lexically.
///
/// # Errors
///
/// Fails if the values cannot be sorted or rendered as text.
pub fn observed_levels(series: &Series) -> Result<Vec<String>> {
    let sorted = series
        .drop_nulls()
        .unique()?
        .sort(SortOptions::default())?
        .cast(&DataType::String)?;
    Ok(sorted
        .str()?
        .into_no_null_iter()
        .map(str::to_owned)
        .collect())
}

fn indicator_columns(series: &Series, encoding: &Encoding) -> Result<Vec<Series>> {
    let labels = series.cast(&DataType::String)?;
    let labels = labels.str()?;

    Ok(encoding
        .levels
        .iter()
        .zip(&encoding.indicators)
        .map(|(level, name)| {
            let values: Vec<i32> = labels
                .into_iter()
                .map(|v| i32::from(v == Some(level.as_str())))
                .collect();
            Series::new(name.as_str().into(), values)
        })
        .collect())
}

/// Replaces every categorical column with one `0/1` column per observed level.
///
/// Columns are handled in table order; each original column is dropped and its
/// indicators `<column>_<level>` are appended at the end in level order. A
/// missing cell is `0` in every indicator of its column.
///
/// # Errors
///
/// Returns [`PrepError::DuplicateColumn`] when an indicator name collides with
/// an existing or previously produced column.
pub fn one_hot_encode(table: &Table) -> Result<(Table, Vec<Encoding>)> {
    one_hot_encode_except(table, &[])
}

/// Like [`one_hot_encode`], but the columns in `keep` stay as they are.
///
/// Used for outcome columns, which must survive encoding as labels.
///
/// # Errors
///
/// - [`PrepError::ColumnNotFound`] for an unknown name in `keep`
/// - [`PrepError::DuplicateColumn`] as for [`one_hot_encode`]
pub fn one_hot_encode_except(table: &Table, keep: &[String]) -> Result<(Table, Vec<Encoding>)> {
    for name in keep {
        table.kind(name)?;
    }
    let categorical: Vec<String> = table
        .categorical_columns()
        .into_iter()
        .filter(|name| !keep.contains(name))
        .collect();
    if categorical.is_empty() {
        return Ok((table.clone(), Vec::new()));
    }

    let mut frame = table.frame().clone();
    let mut taken: Vec<String> = table
        .column_names()
        .into_iter()
        .filter(|n| !categorical.contains(n))
        .collect();
    let mut encodings = Vec::with_capacity(categorical.len());
    let mut appended = Vec::new();

    for name in &categorical {
        let series = table.series(name)?;
        let levels = observed_levels(series)?;
        let indicators = level_column_names(name, &levels);

        for indicator in &indicators {
            if taken.contains(indicator) {
                return Err(PrepError::DuplicateColumn(indicator.clone()));
            }
            taken.push(indicator.clone());
        }

        let encoding = Encoding {
            column: name.clone(),
            levels,
            indicators,
        };
        appended.extend(indicator_columns(series, &encoding)?);
        frame = frame.drop(name)?;

        tracing::debug!(
            column = %name,
            levels = encoding.levels.len(),
            "One-hot encoded column"
        );
        encodings.push(encoding);
    }

    for indicator in appended {
        frame.with_column(indicator)?;
    }

    tracing::info!(
        encoded = encodings.len(),
        columns = frame.width(),
        "Encoded categorical columns"
    );
    let mut encoded = Table::new(frame);
    for name in keep {
        encoded.set_kind(name, table.kind(name)?)?;
    }
    Ok((encoded, encodings))
}
