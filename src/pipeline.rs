//! Orchestration of a complete payroll run.
//!
//! [`run_pipeline`] composes the stages from [`crate::payroll`] in their
//! fixed order (load, clean, derive, views, export) and produces a
//! [`RunReport`]. Nothing in the stages prints; callers that want to see the
//! intermediate tables pass a [`StageObserver`].
//!
//! # Example
//!
//! ```no_run
//! use payroll_clean::config::PipelineConfig;
//! use payroll_clean::pipeline::{TracingObserver, load_source, run_pipeline};
//!
//! let (raw, source) = load_source(None)?;
//! let output = run_pipeline(raw, source, &PipelineConfig::default(), &TracingObserver)?;
//! println!("{}", output.report.summary());
//! # Ok::<(), payroll_clean::error::PayrollError>(())
//! ```

pub mod executor;
pub mod observer;
pub mod report;

pub use executor::{PipelineOutput, load_source, run_pipeline};
pub use observer::{NoopObserver, StageObserver, TracingObserver};
pub use report::{ReportViews, RunReport};
