//! Column names and typed row access for the employee table.

use crate::error::{PayrollError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const AGE: &str = "age";
pub const DEPARTMENT: &str = "department";
pub const SALARY: &str = "salary";
pub const BONUS: &str = "bonus";
pub const CITY: &str = "city";
pub const TOTAL_SALARY: &str = "total_salary";
pub const TAX: &str = "tax";
pub const NET_SALARY: &str = "net_salary";

/// Placeholder for missing `name` and `city` values.
pub const UNKNOWN: &str = "Unknown";

/// Columns of a raw employee table, in output order.
pub const RAW_COLUMNS: [&str; 7] = [ID, NAME, AGE, DEPARTMENT, SALARY, BONUS, CITY];

pub const DERIVED_COLUMNS: [&str; 3] = [TOTAL_SALARY, TAX, NET_SALARY];

/// Header of the exported CSV.
pub const OUTPUT_COLUMNS: [&str; 10] = [
    ID,
    NAME,
    AGE,
    DEPARTMENT,
    SALARY,
    BONUS,
    CITY,
    TOTAL_SALARY,
    TAX,
    NET_SALARY,
];

/// Fails with a [`PayrollError::Schema`] naming the first missing column.
pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    let schema = df.schema();
    match columns.iter().copied().find(|name| !schema.contains(name)) {
        Some(missing) => Err(PayrollError::Schema(format!(
            "missing required column '{missing}'"
        ))),
        None => Ok(()),
    }
}

/// One fully cleaned and derived employee row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub age: f64,
    pub department: String,
    pub salary: f64,
    pub bonus: f64,
    pub city: String,
    pub total_salary: f64,
    pub tax: f64,
    pub net_salary: f64,
}

impl Employee {
    /// Read row `idx` of a derived table.
    pub fn from_row(df: &DataFrame, idx: usize) -> Result<Self> {
        if idx >= df.height() {
            return Err(PayrollError::DataProcessing(format!(
                "row {idx} out of bounds for table of height {}",
                df.height()
            )));
        }
        Ok(Self {
            id: i64_at(df, ID, idx)?,
            name: str_at(df, NAME, idx)?,
            age: f64_at(df, AGE, idx)?,
            department: str_at(df, DEPARTMENT, idx)?,
            salary: f64_at(df, SALARY, idx)?,
            bonus: f64_at(df, BONUS, idx)?,
            city: str_at(df, CITY, idx)?,
            total_salary: f64_at(df, TOTAL_SALARY, idx)?,
            tax: f64_at(df, TAX, idx)?,
            net_salary: f64_at(df, NET_SALARY, idx)?,
        })
    }

    /// Read every row of a derived table, in table order.
    pub fn all_from(df: &DataFrame) -> Result<Vec<Self>> {
        require_columns(df, &OUTPUT_COLUMNS)?;
        (0..df.height()).map(|idx| Self::from_row(df, idx)).collect()
    }
}

fn null_at(column: &str, idx: usize) -> PayrollError {
    PayrollError::DataProcessing(format!("unexpected null in '{column}' at row {idx}"))
}

pub(crate) fn str_at(df: &DataFrame, column: &str, idx: usize) -> Result<String> {
    let series = df.column(column)?.as_materialized_series();
    series
        .str()?
        .get(idx)
        .map(str::to_owned)
        .ok_or_else(|| null_at(column, idx))
}

pub(crate) fn f64_at(df: &DataFrame, column: &str, idx: usize) -> Result<f64> {
    let series = df.column(column)?.as_materialized_series();
    series.f64()?.get(idx).ok_or_else(|| null_at(column, idx))
}

pub(crate) fn i64_at(df: &DataFrame, column: &str, idx: usize) -> Result<i64> {
    let series = df.column(column)?.as_materialized_series();
    series.i64()?.get(idx).ok_or_else(|| null_at(column, idx))
}
