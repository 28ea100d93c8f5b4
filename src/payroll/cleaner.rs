//! Cleaning stage: deduplication, imputation and numeric coercion.
//!
//! The stage runs in a fixed order:
//!
//! 1. Drop exact duplicate rows across the seven raw columns, keeping the
//!    first occurrence.
//! 2. Coerce `age`, `salary` and `bonus` to numbers. Values that do not
//!    parse, and `NaN`, become null. `id` and `department` are required: a
//!    missing department or an id that is not an integer is a schema error.
//! 3. Compute the mean age once, from the deduplicated table, and fill missing
//!    ages with it. Missing names and cities become [`UNKNOWN`]; missing
//!    income becomes `0` (or fails under [`IncomeFill::Strict`]).
//! 4. Drop duplicates again, since imputation can make two distinct raw rows
//!    identical (`null` vs `"Unknown"`, `"50000"` vs `"50000.0"`).
//!
//! The output satisfies every invariant the deriver relies on, and cleaning it
//! again returns an equal table.

use super::schema::{
    AGE, BONUS, CITY, DEPARTMENT, ID, NAME, RAW_COLUMNS, SALARY, UNKNOWN, require_columns,
};
use crate::config::{AgePolicy, CleanOptions, IncomeFill};
use crate::error::{PayrollError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Counts of what the cleaner changed, for the run report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanSummary {
    pub rows_in: usize,
    pub rows_out: usize,
    pub duplicates_removed: usize,
    pub names_imputed: usize,
    pub ages_imputed: usize,
    pub cities_imputed: usize,
    pub salaries_imputed: usize,
    pub bonuses_imputed: usize,
    /// Present but unparsable salary values
    pub salaries_unparsable: usize,
    /// Present but unparsable bonus values
    pub bonuses_unparsable: usize,
    /// Value used for missing ages
    pub age_fill: f64,
}

#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub table: DataFrame,
    pub summary: CleanSummary,
}

/// Clean a raw employee table.
///
/// # Errors
///
/// See [`clean_with_summary`].
pub fn clean(raw: DataFrame, options: &CleanOptions) -> Result<DataFrame> {
    clean_with_summary(raw, options).map(|outcome| outcome.table)
}

/// Clean a raw employee table and report what changed.
///
/// # Errors
///
/// Returns [`PayrollError::Schema`] if a raw column is missing, an `id` is
/// missing or not an integer, or a `department` is missing. Fails with
/// [`PayrollError::MissingIncome`] or [`PayrollError::MissingAges`] when the
/// options ask for strict handling and the data has gaps.
pub fn clean_with_summary(raw: DataFrame, options: &CleanOptions) -> Result<CleanOutcome> {
    require_columns(&raw, &RAW_COLUMNS)?;
    let rows_in = raw.height();

    let deduped = raw
        .select(RAW_COLUMNS)?
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;

    let coerced = coerce_columns(&deduped)?;
    require_present(&coerced, ID, "missing or non-integer")?;
    require_present(&coerced, DEPARTMENT, "missing")?;

    let salaries_unparsable = newly_null(&deduped, &coerced, SALARY)?;
    let bonuses_unparsable = newly_null(&deduped, &coerced, BONUS)?;
    let mut summary = CleanSummary {
        rows_in,
        names_imputed: coerced.column(NAME)?.null_count(),
        ages_imputed: coerced.column(AGE)?.null_count(),
        cities_imputed: coerced.column(CITY)?.null_count(),
        salaries_imputed: coerced.column(SALARY)?.null_count(),
        bonuses_imputed: coerced.column(BONUS)?.null_count(),
        salaries_unparsable,
        bonuses_unparsable,
        ..CleanSummary::default()
    };

    if options.income_fill == IncomeFill::Strict {
        for (column, rows) in [
            (SALARY, summary.salaries_imputed),
            (BONUS, summary.bonuses_imputed),
        ] {
            if rows > 0 {
                return Err(PayrollError::MissingIncome { column, rows });
            }
        }
    }

    summary.age_fill = age_fill_value(&coerced, summary.ages_imputed, options.age_policy)?;

    let table = coerced
        .lazy()
        .with_columns([
            col(NAME).fill_null(lit(UNKNOWN)),
            col(AGE).fill_null(lit(summary.age_fill)),
            col(CITY).fill_null(lit(UNKNOWN)),
            col(SALARY).fill_null(lit(0.0)),
            col(BONUS).fill_null(lit(0.0)),
        ])
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;

    summary.rows_out = table.height();
    summary.duplicates_removed = rows_in - summary.rows_out;

    tracing::info!(
        rows_in,
        rows_out = summary.rows_out,
        duplicates_removed = summary.duplicates_removed,
        "Cleaned employee table"
    );

    Ok(CleanOutcome { table, summary })
}

/// Cast every raw column to its cleaned type without filling anything.
fn coerce_columns(df: &DataFrame) -> Result<DataFrame> {
    let coerced = df
        .clone()
        .lazy()
        .with_columns([
            col(ID).cast(DataType::Int64),
            col(NAME).cast(DataType::String),
            numeric(df, AGE)?,
            col(DEPARTMENT).cast(DataType::String),
            numeric(df, SALARY)?,
            numeric(df, BONUS)?,
            col(CITY).cast(DataType::String),
        ])
        .collect()?;
    Ok(coerced)
}

/// Lenient conversion to `Float64`: text is trimmed first and anything that
/// does not parse becomes null. `NaN` counts as missing too.
fn numeric(df: &DataFrame, name: &str) -> Result<Expr> {
    let expr = match df.column(name)?.dtype() {
        DataType::String => col(name).str().strip_chars(lit(NULL)),
        _ => col(name),
    };
    Ok(expr
        .cast(DataType::Float64)
        .fill_nan(lit(NULL))
        .alias(name))
}

fn require_present(df: &DataFrame, name: &str, what: &str) -> Result<()> {
    match df.column(name)?.null_count() {
        0 => Ok(()),
        rows => Err(PayrollError::Schema(format!(
            "column '{name}' has {rows} {what} value(s)"
        ))),
    }
}

/// Values that were present before coercion and null after it.
fn newly_null(before: &DataFrame, after: &DataFrame, name: &str) -> Result<usize> {
    let nulls_before = before.column(name)?.null_count();
    let nulls_after = after.column(name)?.null_count();
    Ok(nulls_after.saturating_sub(nulls_before))
}

fn age_fill_value(coerced: &DataFrame, missing: usize, policy: AgePolicy) -> Result<f64> {
    let mean = coerced.column(AGE)?.as_materialized_series().mean();
    match (mean, policy) {
        (Some(mean), _) => Ok(mean),
        (None, _) if missing == 0 => Ok(0.0),
        (None, AgePolicy::Zero) => {
            tracing::warn!(missing, "No ages present to average; imputing 0");
            Ok(0.0)
        }
        (None, AgePolicy::Fail) => Err(PayrollError::MissingAges),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::loader::{RawEmployee, from_records, sample_table};

    fn f64_values(df: &DataFrame, name: &str) -> anyhow::Result<Vec<Option<f64>>> {
        Ok(df
            .column(name)?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect())
    }

    fn str_values(df: &DataFrame, name: &str) -> anyhow::Result<Vec<Option<String>>> {
        Ok(df
            .column(name)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_owned))
            .collect())
    }

    fn raw(id: i64, name: Option<&str>, age: Option<f64>, salary: Option<&str>) -> RawEmployee {
        RawEmployee {
            id,
            name: name.map(str::to_owned),
            age,
            department: "IT".to_owned(),
            salary: salary.map(str::to_owned),
            bonus: Some(100.0),
            city: Some("Pune".to_owned()),
        }
    }

    #[test]
    fn test_reference_table_cleaning() -> anyhow::Result<()> {
        let outcome = clean_with_summary(sample_table()?, &CleanOptions::default())?;
        let df = &outcome.table;

        assert_eq!(df.height(), 5);
        assert_eq!(outcome.summary.duplicates_removed, 1);

        assert_eq!(
            f64_values(df, SALARY)?,
            vec![Some(50000.0), Some(45000.0), Some(60000.0), Some(0.0), Some(40000.0)]
        );
        assert_eq!(
            f64_values(df, BONUS)?,
            vec![Some(5000.0), Some(4000.0), Some(0.0), Some(3000.0), Some(3500.0)]
        );
        // mean of 25, 30, 22, 28
        assert_eq!(
            f64_values(df, AGE)?,
            vec![Some(25.0), Some(26.25), Some(30.0), Some(22.0), Some(28.0)]
        );
        assert_eq!(str_values(df, NAME)?[2].as_deref(), Some(UNKNOWN));
        assert_eq!(str_values(df, CITY)?[3].as_deref(), Some(UNKNOWN));

        for name in RAW_COLUMNS {
            assert_eq!(df.column(name)?.null_count(), 0, "nulls left in {name}");
        }
        Ok(())
    }

    #[test]
    fn test_summary_counts() -> anyhow::Result<()> {
        let summary = clean_with_summary(sample_table()?, &CleanOptions::default())?.summary;
        assert_eq!(summary.rows_in, 6);
        assert_eq!(summary.rows_out, 5);
        assert_eq!(summary.names_imputed, 1);
        assert_eq!(summary.ages_imputed, 1);
        assert_eq!(summary.cities_imputed, 1);
        assert_eq!(summary.salaries_imputed, 1);
        assert_eq!(summary.bonuses_imputed, 1);
        assert_eq!(summary.salaries_unparsable, 0);
        assert!((summary.age_fill - 26.25).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_unparsable_salary_becomes_zero() -> anyhow::Result<()> {
        let records = vec![
            raw(1, Some("A"), Some(30.0), Some(" 1200.5 ")),
            raw(2, Some("B"), Some(40.0), Some("n/a")),
            raw(3, Some("C"), Some(50.0), None),
        ];
        let outcome = clean_with_summary(from_records(&records)?, &CleanOptions::default())?;

        assert_eq!(
            f64_values(&outcome.table, SALARY)?,
            vec![Some(1200.5), Some(0.0), Some(0.0)]
        );
        assert_eq!(outcome.summary.salaries_unparsable, 1);
        assert_eq!(outcome.summary.salaries_imputed, 2);
        Ok(())
    }

    #[test]
    fn test_nan_salary_is_treated_as_missing() -> anyhow::Result<()> {
        let records = vec![
            raw(1, Some("A"), Some(30.0), Some("NaN")),
            raw(2, Some("B"), Some(40.0), Some("700")),
        ];
        let outcome = clean_with_summary(from_records(&records)?, &CleanOptions::default())?;

        assert_eq!(
            f64_values(&outcome.table, SALARY)?,
            vec![Some(0.0), Some(700.0)]
        );
        assert_eq!(outcome.summary.salaries_unparsable, 1);
        assert_eq!(outcome.summary.salaries_imputed, 1);
        Ok(())
    }

    #[test]
    fn test_nan_age_gets_the_mean() -> anyhow::Result<()> {
        let records = vec![
            raw(1, Some("A"), Some(20.0), Some("1")),
            raw(2, Some("B"), Some(f64::NAN), Some("2")),
            raw(3, Some("C"), Some(40.0), Some("3")),
        ];
        let outcome = clean_with_summary(from_records(&records)?, &CleanOptions::default())?;

        assert_eq!(
            f64_values(&outcome.table, AGE)?,
            vec![Some(20.0), Some(30.0), Some(40.0)]
        );
        assert_eq!(outcome.summary.ages_imputed, 1);
        Ok(())
    }

    #[test]
    fn test_non_integer_id_is_schema_error() -> anyhow::Result<()> {
        let mut df = sample_table()?;
        let ids = ["E1", "2", "3", "4", "5", "5"];
        df.replace(ID, Series::new(ID.into(), ids))?;

        let err = clean(df, &CleanOptions::default()).unwrap_err();
        match err {
            PayrollError::Schema(msg) => assert!(msg.contains("'id'"), "{msg}"),
            other => panic!("expected schema error, got {other}"),
        }
        Ok(())
    }

    #[test]
    fn test_missing_department_is_schema_error() -> anyhow::Result<()> {
        let mut df = from_records(&[raw(1, Some("A"), Some(30.0), Some("1"))])?;
        df.replace(
            DEPARTMENT,
            Series::new(DEPARTMENT.into(), [None::<&str>]),
        )?;

        let err = clean(df, &CleanOptions::default()).unwrap_err();
        match err {
            PayrollError::Schema(msg) => assert!(msg.contains("'department'"), "{msg}"),
            other => panic!("expected schema error, got {other}"),
        }
        Ok(())
    }

    #[test]
    fn test_numeric_salary_column_is_accepted() -> anyhow::Result<()> {
        let mut df = from_records(&[raw(1, Some("A"), Some(30.0), None)])?;
        df.replace(SALARY, Series::new(SALARY.into(), [Some(900i64)]))?;

        let cleaned = clean(df, &CleanOptions::default())?;
        assert_eq!(f64_values(&cleaned, SALARY)?, vec![Some(900.0)]);
        Ok(())
    }

    #[test]
    fn test_age_mean_is_computed_once() -> anyhow::Result<()> {
        // Both gaps get the mean of 20 and 40, not a running mean.
        let records = vec![
            raw(1, Some("A"), Some(20.0), Some("1")),
            raw(2, Some("B"), None, Some("2")),
            raw(3, Some("C"), Some(40.0), Some("3")),
            raw(4, Some("D"), None, Some("4")),
        ];
        let cleaned = clean(from_records(&records)?, &CleanOptions::default())?;
        assert_eq!(
            f64_values(&cleaned, AGE)?,
            vec![Some(20.0), Some(30.0), Some(40.0), Some(30.0)]
        );
        Ok(())
    }

    #[test]
    fn test_all_ages_missing_policy() -> anyhow::Result<()> {
        let records = vec![
            raw(1, Some("A"), None, Some("1")),
            raw(2, Some("B"), None, Some("2")),
        ];

        let cleaned = clean(from_records(&records)?, &CleanOptions::default())?;
        assert_eq!(f64_values(&cleaned, AGE)?, vec![Some(0.0), Some(0.0)]);

        let strict = CleanOptions {
            age_policy: AgePolicy::Fail,
            ..CleanOptions::default()
        };
        let err = clean(from_records(&records)?, &strict).unwrap_err();
        assert!(matches!(err, PayrollError::MissingAges));
        Ok(())
    }

    #[test]
    fn test_strict_income_rejects_missing_salary() -> anyhow::Result<()> {
        let options = CleanOptions {
            income_fill: IncomeFill::Strict,
            ..CleanOptions::default()
        };
        let err = clean(sample_table()?, &options).unwrap_err();
        assert!(matches!(
            err,
            PayrollError::MissingIncome {
                column: "salary",
                rows: 1
            }
        ));
        Ok(())
    }

    #[test]
    fn test_imputation_collisions_are_deduplicated() -> anyhow::Result<()> {
        let records = vec![
            raw(1, None, Some(30.0), Some("500")),
            raw(1, Some(UNKNOWN), Some(30.0), Some("500")),
            raw(1, Some(UNKNOWN), Some(30.0), Some("500.0")),
        ];
        let outcome = clean_with_summary(from_records(&records)?, &CleanOptions::default())?;
        assert_eq!(outcome.table.height(), 1);
        assert_eq!(outcome.summary.duplicates_removed, 2);
        Ok(())
    }

    #[test]
    fn test_clean_is_idempotent() -> anyhow::Result<()> {
        let once = clean(sample_table()?, &CleanOptions::default())?;
        let twice = clean(once.clone(), &CleanOptions::default())?;
        assert!(once.equals_missing(&twice));
        Ok(())
    }

    #[test]
    fn test_empty_table() -> anyhow::Result<()> {
        let cleaned = clean(from_records(&[])?, &CleanOptions::default())?;
        assert_eq!(cleaned.height(), 0);
        assert_eq!(cleaned.width(), RAW_COLUMNS.len());
        Ok(())
    }

    #[test]
    fn test_missing_column_is_schema_error() -> anyhow::Result<()> {
        let df = sample_table()?.drop(CITY)?;
        let err = clean(df, &CleanOptions::default()).unwrap_err();
        assert!(matches!(err, PayrollError::Schema(_)));
        Ok(())
    }
}
