//! Report generated after a pipeline run.

use crate::error::{PayrollError, Result, ResultExt as _};
use crate::payroll::{CityCount, CleanSummary, DepartmentAverage, Employee};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Results of the read-only views over the derived table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportViews {
    pub salary_threshold: f64,
    pub high_salary: Vec<Employee>,
    pub city: String,
    pub in_city: Vec<Employee>,
    pub age_threshold: f64,
    pub older_than: Vec<Employee>,
    pub department_averages: Vec<DepartmentAverage>,
    /// `None` when the derived table is empty
    pub top_earner: Option<Employee>,
    pub city_counts: Vec<CityCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,

    /// Where the raw table came from
    pub source: String,

    pub clean: CleanSummary,
    pub tax_rate: f64,
    pub views: ReportViews,

    /// Path of the exported CSV, if the export stage ran
    pub output: Option<PathBuf>,

    /// Wall-clock time of the whole run
    pub duration_ms: u64,
}

impl RunReport {
    /// One-line summary for logs and the console.
    pub fn summary(&self) -> String {
        format!(
            "Payroll run: {} rows in, {} rows out ({} duplicate(s) removed), {} imputed value(s), {}",
            self.clean.rows_in,
            self.clean.rows_out,
            self.clean.duplicates_removed,
            self.imputed_values(),
            match &self.output {
                Some(path) => format!("saved {}", path.display()),
                None => "no export".to_owned(),
            }
        )
    }

    pub fn imputed_values(&self) -> usize {
        let c = &self.clean;
        c.names_imputed + c.ages_imputed + c.cities_imputed + c.salaries_imputed + c.bonuses_imputed
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize run report")
    }

    /// Save the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| PayrollError::File {
            path: path.to_path_buf(),
            source,
        })
    }
}
