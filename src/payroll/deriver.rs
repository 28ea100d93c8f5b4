//! Derivation stage: payroll columns computed from cleaned income.
//!
//! Every row gets `total_salary = salary + bonus`, `tax = salary * tax_rate`
//! and `net_salary = total_salary - tax`. Tax is not rounded.

use super::schema::{BONUS, NET_SALARY, SALARY, TAX, TOTAL_SALARY, require_columns};
use crate::error::{PayrollError, Result};
use polars::prelude::*;

/// Append the three derived columns to a cleaned table.
///
/// # Errors
///
/// Returns [`PayrollError::NotCleaned`] if `salary` or `bonus` is not a null-free
/// `Float64` column, which is what the cleaner guarantees.
pub fn derive(cleaned: DataFrame, tax_rate: f64) -> Result<DataFrame> {
    require_columns(&cleaned, &[SALARY, BONUS])?;
    for name in [SALARY, BONUS] {
        let column = cleaned.column(name)?;
        if column.dtype() != &DataType::Float64 {
            return Err(PayrollError::NotCleaned(format!(
                "'{name}' has type {}, expected f64",
                column.dtype()
            )));
        }
        if column.null_count() > 0 {
            return Err(PayrollError::NotCleaned(format!(
                "'{name}' has {} null value(s)",
                column.null_count()
            )));
        }
    }

    let derived = cleaned
        .lazy()
        .with_columns([
            (col(SALARY) + col(BONUS)).alias(TOTAL_SALARY),
            (col(SALARY) * lit(tax_rate)).alias(TAX),
        ])
        .with_column((col(TOTAL_SALARY) - col(TAX)).alias(NET_SALARY))
        .collect()?;

    tracing::info!(rows = derived.height(), tax_rate, "Derived payroll columns");
    Ok(derived)
}
