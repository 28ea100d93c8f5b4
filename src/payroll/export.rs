//! CSV export of employee tables.

use super::schema::{OUTPUT_COLUMNS, RAW_COLUMNS, require_columns};
use crate::error::{PayrollError, Result};
use polars::prelude::*;
use std::path::Path;

/// Write the final table to `path` as CSV.
///
/// The header is exactly [`OUTPUT_COLUMNS`]; rows keep the table's order and
/// no index column is written.
///
/// # Errors
///
/// Returns [`PayrollError::Schema`] if a derived column is missing and
/// [`PayrollError::File`] naming `path` if the file cannot be written.
pub fn export(table: &DataFrame, path: &Path) -> Result<()> {
    write_columns(table, &OUTPUT_COLUMNS, path)
}

/// Write a raw (uncleaned) table, e.g. the reference sample, to `path`.
///
/// # Errors
///
/// Returns [`PayrollError::Schema`] if a raw column is missing and
/// [`PayrollError::File`] naming `path` if the file cannot be written.
pub fn export_raw(table: &DataFrame, path: &Path) -> Result<()> {
    write_columns(table, &RAW_COLUMNS, path)
}

fn write_columns(table: &DataFrame, columns: &[&str], path: &Path) -> Result<()> {
    require_columns(table, columns)?;
    let mut ordered = table.select(columns.iter().copied())?;

    let file_error = |source: std::io::Error| PayrollError::File {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(file_error)?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut ordered)
        .map_err(|e| file_error(std::io::Error::other(e.to_string())))?;

    tracing::info!(
        path = %path.display(),
        rows = ordered.height(),
        "Exported CSV"
    );
    Ok(())
}
