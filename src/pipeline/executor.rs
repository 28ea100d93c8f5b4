//! Pipeline execution engine.
//!
//! Runs the payroll stages in order against a raw table, hands every
//! intermediate table to a [`StageObserver`], writes the outputs the config
//! asks for and returns a [`RunReport`].

use super::observer::StageObserver;
use super::report::{ReportViews, RunReport};
use crate::config::PipelineConfig;
use crate::error::{PayrollError, Result};
use crate::payroll::{self, Employee, views};
use chrono::Utc;
use polars::prelude::DataFrame;
use std::path::Path;

/// Final table of a run plus its report.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: DataFrame,
    pub report: RunReport,
}

/// Load the raw table from a CSV file, or the reference sample when no path
/// is given. Returns the table and a label describing its source.
pub fn load_source(input: Option<&Path>) -> Result<(DataFrame, String)> {
    match input {
        Some(path) => Ok((payroll::load_csv(path)?, path.display().to_string())),
        None => Ok((payroll::sample_table()?, "reference sample".to_owned())),
    }
}

/// Execute the full pipeline on `raw`.
///
/// # Errors
///
/// Fails on an invalid config, a clean-stage policy violation, or an I/O
/// failure while writing the CSV or report. An empty derived table only
/// leaves the top-earner view empty.
pub fn run_pipeline(
    raw: DataFrame,
    source: impl Into<String>,
    config: &PipelineConfig,
    observer: &dyn StageObserver,
) -> Result<PipelineOutput> {
    let start = std::time::Instant::now();
    config.validate()?;
    let source = source.into();

    tracing::info!(source = %source, rows = raw.height(), "Starting payroll run");
    observer.on_table("Original Data", &raw);

    let cleaned = payroll::clean_with_summary(raw, &config.clean)?;
    observer.on_table("Cleaned Data", &cleaned.table);

    let table = payroll::derive(cleaned.table, config.tax_rate)?;
    observer.on_table("Data After Salary Computation", &table);

    let views = build_views(&table, config, observer)?;

    if let Some(path) = &config.output {
        payroll::export(&table, path)?;
    }

    let report = RunReport {
        generated_at: Utc::now(),
        source,
        clean: cleaned.summary,
        tax_rate: config.tax_rate,
        views,
        output: config.output.clone(),
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    };

    if let Some(path) = &config.report {
        report.write_json(path)?;
        tracing::info!(path = %path.display(), "Wrote run report");
    }

    tracing::info!("{}", report.summary());
    Ok(PipelineOutput { table, report })
}

fn build_views(
    table: &DataFrame,
    config: &PipelineConfig,
    observer: &dyn StageObserver,
) -> Result<ReportViews> {
    let opts = &config.views;

    let high_salary = views::salary_above(table, opts.salary_threshold)?;
    observer.on_table(
        &format!("Employees with Salary > {}", opts.salary_threshold),
        &high_salary,
    );

    let in_city = views::in_city(table, &opts.city)?;
    observer.on_table(&format!("Employees from {}", opts.city), &in_city);

    let older = views::age_above(table, opts.age_threshold)?;
    observer.on_table(&format!("Employees Age > {}", opts.age_threshold), &older);

    let averages = views::department_average_frame(table)?;
    observer.on_table("Avg Salary per Department", &averages);

    let top_earner = match views::top_earner(table) {
        Ok(employee) => {
            observer.on_table("Highest Paid Employee", &views::by_net_salary(table)?.head(Some(1)));
            Some(employee)
        }
        Err(PayrollError::EmptyTable(query)) => {
            tracing::warn!(query, "Skipping view on empty table");
            None
        }
        Err(e) => return Err(e),
    };

    let counts = views::city_count_frame(table)?;
    observer.on_table("Employees per City", &counts);

    Ok(ReportViews {
        salary_threshold: opts.salary_threshold,
        high_salary: Employee::all_from(&high_salary)?,
        city: opts.city.clone(),
        in_city: Employee::all_from(&in_city)?,
        age_threshold: opts.age_threshold,
        older_than: Employee::all_from(&older)?,
        department_averages: views::average_salary_by_department(table)?,
        top_earner,
        city_counts: views::city_counts(table)?,
    })
}
