use super::types::Table;
use crate::error::{PrepError, Result, ResultExt as _};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a delimited input file is parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadOptions {
    /// Field delimiter, a single ASCII character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Whether the first line holds column names
    #[serde(default = "default_true")]
    pub has_header: bool,

    /// Cell contents read as missing
    #[serde(default = "default_null_values")]
    pub null_values: Vec<String>,

    /// Rows scanned to infer column dtypes
    #[serde(default = "default_infer_schema_length")]
    pub infer_schema_length: usize,
}

fn default_delimiter() -> String {
    ",".to_owned()
}

fn default_true() -> bool {
    true
}

fn default_null_values() -> Vec<String> {
    vec!["?".to_owned(), "NA".to_owned(), String::new()]
}

fn default_infer_schema_length() -> usize {
    10_000
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_header: default_true(),
            null_values: default_null_values(),
            infer_schema_length: default_infer_schema_length(),
        }
    }
}

impl ReadOptions {
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] unless the delimiter is one ASCII character.
    pub fn separator(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(PrepError::Config(format!(
                "Delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Reads a delimited (or Parquet) file into a [`Table`] with inferred kinds.
///
/// # Errors
///
/// Fails on unreadable files, unsupported extensions and malformed content.
pub fn load_table(path: &Path, options: &ReadOptions) -> Result<Table> {
    let frame = match extension(path).as_str() {
        "parquet" => ParquetReader::new(std::fs::File::open(path)?)
            .finish()
            .context("Failed to read Parquet")?,
        "csv" | "tsv" | "txt" | "data" => {
            let null_values = options
                .null_values
                .iter()
                .map(|v| PlSmallStr::from(v.as_str()))
                .collect::<Vec<_>>();
            LazyCsvReader::new(path)
                .with_has_header(options.has_header)
                .with_separator(options.separator()?)
                .with_infer_schema_length(Some(options.infer_schema_length))
                .with_null_values(Some(NullValues::AllColumns(null_values)))
                .finish()?
                .collect()
                .context("Failed to read CSV")?
        }
        ext => {
            return Err(PrepError::Config(format!(
                "Unsupported file extension: '{ext}'"
            )));
        }
    };

    tracing::info!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "Loaded table"
    );
    Ok(Table::new(frame))
}

/// Writes `table` as CSV, or Parquet when the path ends in `.parquet`.
///
/// # Errors
///
/// Fails when the file cannot be created or written.
pub fn save_table(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut frame = table.frame().clone();
    let file = std::fs::File::create(path)?;
    if extension(path) == "parquet" {
        ParquetWriter::new(file)
            .finish(&mut frame)
            .context("Failed to write Parquet file")?;
    } else {
        CsvWriter::new(file)
            .include_header(true)
            .finish(&mut frame)
            .context("Failed to write CSV file")?;
    }

    tracing::debug!(path = %path.display(), "Saved table");
    Ok(())
}
