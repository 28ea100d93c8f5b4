//! Building the raw employee table.
//!
//! The table can come from typed [`RawEmployee`] records (including the
//! built-in reference set) or from a CSV file with the same seven columns.
//! Missing values stay missing here; the cleaner decides what they become.

use super::schema::{AGE, BONUS, CITY, DEPARTMENT, ID, NAME, RAW_COLUMNS, SALARY, require_columns};
use crate::error::{PayrollError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One employee row as it arrives, before any cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEmployee {
    pub id: i64,
    pub name: Option<String>,
    pub age: Option<f64>,
    pub department: String,
    /// Salaries arrive as text and may not parse
    pub salary: Option<String>,
    pub bonus: Option<f64>,
    pub city: Option<String>,
}

impl RawEmployee {
    fn new(
        id: i64,
        name: Option<&str>,
        age: Option<f64>,
        department: &str,
        salary: Option<&str>,
        bonus: Option<f64>,
        city: Option<&str>,
    ) -> Self {
        Self {
            id,
            name: name.map(str::to_owned),
            age,
            department: department.to_owned(),
            salary: salary.map(str::to_owned),
            bonus,
            city: city.map(str::to_owned),
        }
    }
}

/// The reference record set: six rows, the last an exact duplicate of the
/// fifth, with one missing name, age, salary, bonus and city.
#[rustfmt::skip]
pub fn reference_records() -> Vec<RawEmployee> {
    vec![
        RawEmployee::new(1, Some("Ganesh"), Some(25.0), "IT", Some("50000"), Some(5000.0), Some("Hyderabad")),
        RawEmployee::new(2, Some("Rahul"), None, "HR", Some("45000"), Some(4000.0), Some("Chennai")),
        RawEmployee::new(3, None, Some(30.0), "Finance", Some("60000"), None, Some("NCR")),
        RawEmployee::new(4, Some("Teja"), Some(22.0), "IT", None, Some(3000.0), None),
        RawEmployee::new(5, Some("Kiran"), Some(28.0), "HR", Some("40000"), Some(3500.0), Some("Chennai")),
        RawEmployee::new(5, Some("Kiran"), Some(28.0), "HR", Some("40000"), Some(3500.0), Some("Chennai")),
    ]
}

/// Build a raw table from typed records, preserving their order.
///
/// # Errors
///
/// Returns [`PayrollError::DataProcessing`] if polars cannot assemble the
/// columns into a frame.
pub fn from_records(records: &[RawEmployee]) -> Result<DataFrame> {
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let names: Vec<Option<&str>> = records.iter().map(|r| r.name.as_deref()).collect();
    let ages: Vec<Option<f64>> = records.iter().map(|r| r.age).collect();
    let departments: Vec<&str> = records.iter().map(|r| r.department.as_str()).collect();
    let salaries: Vec<Option<&str>> = records.iter().map(|r| r.salary.as_deref()).collect();
    let bonuses: Vec<Option<f64>> = records.iter().map(|r| r.bonus).collect();
    let cities: Vec<Option<&str>> = records.iter().map(|r| r.city.as_deref()).collect();

    let df = DataFrame::new(vec![
        Column::from(Series::new(ID.into(), ids)),
        Column::from(Series::new(NAME.into(), names)),
        Column::from(Series::new(AGE.into(), ages)),
        Column::from(Series::new(DEPARTMENT.into(), departments)),
        Column::from(Series::new(SALARY.into(), salaries)),
        Column::from(Series::new(BONUS.into(), bonuses)),
        Column::from(Series::new(CITY.into(), cities)),
    ])?;
    Ok(df)
}

/// The reference record set as a raw table.
pub fn sample_table() -> Result<DataFrame> {
    from_records(&reference_records())
}

/// Read a raw employee table from a CSV file with a header row.
///
/// Empty fields are read as nulls. Columns beyond the seven raw ones are
/// dropped; a missing raw column is a [`PayrollError::Schema`] error.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    std::fs::metadata(path).map_err(|source| PayrollError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10_000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(|e| {
            PayrollError::DataProcessing(format!("Failed to read CSV {}: {e}", path.display()))
        })?;

    require_columns(&df, &RAW_COLUMNS)?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded CSV"
    );
    Ok(df.select(RAW_COLUMNS)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names().iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_sample_table_shape() -> Result<()> {
        let df = sample_table()?;
        assert_eq!(df.height(), 6);
        assert_eq!(column_names(&df), RAW_COLUMNS);

        assert_eq!(df.column(NAME)?.null_count(), 1);
        assert_eq!(df.column(AGE)?.null_count(), 1);
        assert_eq!(df.column(SALARY)?.null_count(), 1);
        assert_eq!(df.column(BONUS)?.null_count(), 1);
        assert_eq!(df.column(CITY)?.null_count(), 1);
        assert_eq!(df.column(SALARY)?.dtype(), &DataType::String);
        Ok(())
    }

    #[test]
    fn test_load_csv_keeps_raw_columns_only() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("employees.csv");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "id,name,age,department,salary,bonus,city,extra")?;
        writeln!(file, "1,Ganesh,25,IT,50000,5000,Hyderabad,x")?;
        writeln!(file, "2,,,HR,abc,,Chennai,y")?;
        drop(file);

        let df = load_csv(&path)?;
        assert_eq!(df.height(), 2);
        assert_eq!(column_names(&df), RAW_COLUMNS);
        assert_eq!(df.column(NAME)?.null_count(), 1);
        assert_eq!(df.column(AGE)?.null_count(), 1);
        assert_eq!(df.column(BONUS)?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_load_csv_missing_column() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("employees.csv");
        std::fs::write(&path, "id,name,age,department,salary,bonus\n1,A,30,IT,10,1\n")?;

        let err = load_csv(&path).unwrap_err();
        assert!(matches!(err, PayrollError::Schema(ref msg) if msg.contains("'city'")));
        Ok(())
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, PayrollError::File { .. }));
    }
}
