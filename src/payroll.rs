//! Employee table stages.
//!
//! A payroll run is a straight line of table transformations, each taking
//! ownership of the previous stage's frame and returning a new one:
//!
//! ```text
//! loader ──> cleaner ──> deriver ──> views (read-only)
//!                                └─> export (CSV)
//! ```
//!
//! - [`loader`]: raw table from typed records or a CSV file
//! - [`cleaner`]: deduplication, imputation and numeric coercion
//! - [`deriver`]: `total_salary`, `tax`, `net_salary`
//! - [`views`]: filters and aggregates over the derived table
//! - [`export`]: CSV output
//!
//! ```no_run
//! use payroll_clean::config::CleanOptions;
//! use payroll_clean::payroll::{clean, derive, sample_table, top_earner};
//!
//! let cleaned = clean(sample_table()?, &CleanOptions::default())?;
//! let derived = derive(cleaned, 0.10)?;
//! println!("Top earner: {}", top_earner(&derived)?.name);
//! # Ok::<(), payroll_clean::error::PayrollError>(())
//! ```

pub mod cleaner;
pub mod deriver;
pub mod export;
pub mod loader;
pub mod schema;
pub mod views;

pub use cleaner::{CleanOutcome, CleanSummary, clean, clean_with_summary};
pub use deriver::derive;
pub use export::{export, export_raw};
pub use loader::{RawEmployee, from_records, load_csv, reference_records, sample_table};
pub use schema::{Employee, OUTPUT_COLUMNS, RAW_COLUMNS};
pub use views::{
    CityCount, DepartmentAverage, age_above, average_salary_by_department, city_counts, in_city,
    salary_above, top_earner,
};
