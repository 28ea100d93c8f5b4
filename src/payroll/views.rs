//! Read-only report views over the derived table.
//!
//! Each view borrows the table and returns a new frame or typed rows; the
//! input is never modified. Grouped results keep the first-seen order of
//! their keys so reports are deterministic.

use super::schema::{AGE, CITY, DEPARTMENT, Employee, NET_SALARY, SALARY, f64_at, str_at};
use crate::error::{PayrollError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const AVERAGE_SALARY: &str = "average_salary";
pub const COUNT: &str = "count";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentAverage {
    pub department: String,
    pub average_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
    pub city: String,
    pub count: u64,
}

/// Rows with `salary` strictly greater than `threshold`.
///
/// # Errors
///
/// Returns [`PayrollError::Schema`] if the `salary` column is missing.
pub fn salary_above(df: &DataFrame, threshold: f64) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .filter(col(SALARY).gt(lit(threshold)))
        .collect()?)
}

/// Rows whose `city` equals `city` exactly (case-sensitive).
///
/// # Errors
///
/// Returns [`PayrollError::Schema`] if the `city` column is missing.
pub fn in_city(df: &DataFrame, city: &str) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .filter(col(CITY).eq(lit(city)))
        .collect()?)
}

/// Rows with `age` strictly greater than `threshold`.
///
/// # Errors
///
/// Returns [`PayrollError::Schema`] if the `age` column is missing.
pub fn age_above(df: &DataFrame, threshold: f64) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .filter(col(AGE).gt(lit(threshold)))
        .collect()?)
}

/// Mean salary per department as a two-column frame.
pub fn department_average_frame(df: &DataFrame) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .group_by_stable([col(DEPARTMENT)])
        .agg([col(SALARY).mean().alias(AVERAGE_SALARY)])
        .collect()?)
}

/// Mean salary per department, in first-seen department order.
pub fn average_salary_by_department(df: &DataFrame) -> Result<Vec<DepartmentAverage>> {
    let grouped = department_average_frame(df)?;
    (0..grouped.height())
        .map(|idx| {
            Ok(DepartmentAverage {
                department: str_at(&grouped, DEPARTMENT, idx)?,
                average_salary: f64_at(&grouped, AVERAGE_SALARY, idx)?,
            })
        })
        .collect()
}

/// The table sorted by `net_salary` descending; ties keep their input order.
pub fn by_net_salary(df: &DataFrame) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .sort_by_exprs(
            vec![col(NET_SALARY)],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?)
}

/// The single row with the highest `net_salary`; the earliest row wins ties.
///
/// # Errors
///
/// Returns [`PayrollError::EmptyTable`] if `df` has no rows.
pub fn top_earner(df: &DataFrame) -> Result<Employee> {
    if df.height() == 0 {
        return Err(PayrollError::EmptyTable("top earner by net salary"));
    }
    let top = by_net_salary(df)?.head(Some(1));
    Employee::from_row(&top, 0)
}

/// Row count per city as a two-column frame, most common first.
pub fn city_count_frame(df: &DataFrame) -> Result<DataFrame> {
    Ok(df
        .clone()
        .lazy()
        .group_by_stable([col(CITY)])
        .agg([len().cast(DataType::UInt64).alias(COUNT)])
        .sort_by_exprs(
            vec![col(COUNT)],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?)
}

/// Row count per city, descending by count; ties keep first-seen city order.
pub fn city_counts(df: &DataFrame) -> Result<Vec<CityCount>> {
    let counts = city_count_frame(df)?;
    let count_values = counts.column(COUNT)?.as_materialized_series().u64()?;
    (0..counts.height())
        .map(|idx| {
            Ok(CityCount {
                city: str_at(&counts, CITY, idx)?,
                count: count_values.get(idx).unwrap_or_default(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleanOptions;
    use crate::payroll::cleaner::clean;
    use crate::payroll::deriver::derive;
    use crate::payroll::loader::sample_table;
    use crate::payroll::schema::ID;

    fn reference() -> anyhow::Result<DataFrame> {
        let cleaned = clean(sample_table()?, &CleanOptions::default())?;
        Ok(derive(cleaned, 0.10)?)
    }

    fn ids(df: &DataFrame) -> anyhow::Result<Vec<i64>> {
        Ok(df
            .column(ID)?
            .as_materialized_series()
            .i64()?
            .into_no_null_iter()
            .collect())
    }

    #[test]
    fn test_salary_filter_is_strict() -> anyhow::Result<()> {
        let df = reference()?;
        let high = salary_above(&df, 45_000.0)?;
        // 45000 itself is excluded
        assert_eq!(ids(&high)?, vec![1, 3]);
        assert_eq!(df.height(), 5, "input must be untouched");
        Ok(())
    }

    #[test]
    fn test_city_filter_is_exact() -> anyhow::Result<()> {
        let df = reference()?;
        assert_eq!(ids(&in_city(&df, "Hyderabad")?)?, vec![1]);
        assert!(in_city(&df, "hyderabad")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_age_filter() -> anyhow::Result<()> {
        let df = reference()?;
        // imputed age 26.25 for id 2 counts
        assert_eq!(ids(&age_above(&df, 25.0)?)?, vec![2, 3, 5]);
        Ok(())
    }

    #[test]
    fn test_department_averages() -> anyhow::Result<()> {
        let averages = average_salary_by_department(&reference()?)?;
        let departments: Vec<&str> = averages.iter().map(|a| a.department.as_str()).collect();
        assert_eq!(departments, vec!["IT", "HR", "Finance"]);

        let values: Vec<f64> = averages.iter().map(|a| a.average_salary).collect();
        assert!((values[0] - 25_000.0).abs() < 1e-9);
        assert!((values[1] - 42_500.0).abs() < 1e-9);
        assert!((values[2] - 60_000.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_top_earner_reference() -> anyhow::Result<()> {
        let top = top_earner(&reference()?)?;
        // 60000 salary with no bonus: 60000 - 6000 tax
        assert_eq!(top.id, 3);
        assert_eq!(top.name, "Unknown");
        assert!((top.net_salary - 54_000.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_top_earner_keeps_first_of_ties() -> anyhow::Result<()> {
        let df = df!(
            ID => [1i64, 2, 3],
            "name" => ["a", "b", "c"],
            AGE => [30.0, 30.0, 30.0],
            DEPARTMENT => ["IT", "IT", "IT"],
            SALARY => [100.0, 200.0, 200.0],
            "bonus" => [0.0, 0.0, 0.0],
            CITY => ["X", "Y", "Z"],
            "total_salary" => [100.0, 200.0, 200.0],
            "tax" => [0.0, 0.0, 0.0],
            NET_SALARY => [100.0, 200.0, 200.0]
        )?;
        let top = top_earner(&df)?;
        assert_eq!(top.id, 2);
        Ok(())
    }

    #[test]
    fn test_top_earner_empty_table() -> anyhow::Result<()> {
        let df = reference()?.head(Some(0));
        let err = top_earner(&df).unwrap_err();
        assert!(matches!(err, PayrollError::EmptyTable(_)));
        Ok(())
    }

    #[test]
    fn test_city_counts_order() -> anyhow::Result<()> {
        let counts = city_counts(&reference()?)?;
        let pairs: Vec<(&str, u64)> = counts.iter().map(|c| (c.city.as_str(), c.count)).collect();
        assert_eq!(
            pairs,
            vec![("Chennai", 2), ("Hyderabad", 1), ("NCR", 1), ("Unknown", 1)]
        );
        Ok(())
    }
}
