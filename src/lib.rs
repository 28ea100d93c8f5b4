//! # payroll-clean - Employee Table Cleaning and Payroll Derivation
//!
//! payroll-clean takes a small table of employee records, cleans it, derives
//! payroll figures, answers a handful of report queries and writes the result
//! to CSV.
//!
//! ## Quick Start
//!
//! ```no_run
//! use payroll_clean::config::PipelineConfig;
//! use payroll_clean::pipeline::{NoopObserver, load_source, run_pipeline};
//!
//! let (raw, source) = load_source(None)?;
//! let output = run_pipeline(raw, source, &PipelineConfig::default(), &NoopObserver)?;
//!
//! for avg in &output.report.views.department_averages {
//!     println!("{}: {:.2}", avg.department, avg.average_salary);
//! }
//! # Ok::<(), payroll_clean::error::PayrollError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`payroll`]: the individual stages (loader, cleaner, deriver, views, export)
//! - [`pipeline`]: orchestration, observers and the run report
//! - [`config`]: pipeline configuration and cleaning policies
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing subscriber setup
//!
//! ## Key Concepts
//!
//! ### Explicit Missing Values
//!
//! Missing values are column nulls (or `Option::None` in [`payroll::RawEmployee`]),
//! never sentinel numbers, so a declared salary of `0` and an unknown salary
//! stay distinguishable until the cleaner deliberately merges them.
//!
//! ### Lazy Evaluation
//!
//! Stages are written as Polars `LazyFrame` query plans and collected once per
//! stage:
//!
//! ```no_run
//! use polars::prelude::*;
//!
//! let df = df!("salary" => [50_000.0, 45_000.0])?;
//! let high = df.lazy().filter(col("salary").gt(lit(45_000.0))).collect()?;
//! assert_eq!(high.height(), 1);
//! # Ok::<(), PolarsError>(())
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod payroll;
pub mod pipeline;
