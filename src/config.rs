//! Pipeline configuration.
//!
//! Every field has a default that reproduces the reference payroll run, so an
//! empty JSON object (or no config file at all) is a valid configuration.

use crate::error::{PayrollError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "cleaned_employee_data.csv";
pub const DEFAULT_SALARY_THRESHOLD: f64 = 45_000.0;
pub const DEFAULT_AGE_THRESHOLD: f64 = 25.0;
pub const DEFAULT_CITY: &str = "Hyderabad";
pub const DEFAULT_TAX_RATE: f64 = 0.10;

/// What to do when no row has an age to average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgePolicy {
    /// Impute missing ages with `0`
    #[default]
    Zero,
    /// Fail the clean stage with [`PayrollError::MissingAges`]
    Fail,
}

/// How missing or unparsable salary and bonus values are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeFill {
    /// Treat unknown income as `0`
    #[default]
    Zero,
    /// Refuse to clean a table with unknown income
    Strict,
}

/// Options consumed by the cleaner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    pub age_policy: AgePolicy,
    pub income_fill: IncomeFill,
}

/// Thresholds for the read-only report views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    /// Rows with `salary` strictly above this are "high salary"
    pub salary_threshold: f64,

    /// Rows with `age` strictly above this are listed
    pub age_threshold: f64,

    /// Exact, case-sensitive city match
    pub city: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            salary_threshold: DEFAULT_SALARY_THRESHOLD,
            age_threshold: DEFAULT_AGE_THRESHOLD,
            city: DEFAULT_CITY.to_owned(),
        }
    }
}

/// Root configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub clean: CleanOptions,
    pub views: ViewOptions,

    /// Fraction of `salary` withheld as tax
    pub tax_rate: f64,

    /// Destination of the cleaned CSV; `None` skips the export stage
    pub output: Option<PathBuf>,

    /// Optional JSON run report
    pub report: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clean: CleanOptions::default(),
            views: ViewOptions::default(),
            tax_rate: DEFAULT_TAX_RATE,
            output: Some(PathBuf::from(DEFAULT_OUTPUT_FILE)),
            report: None,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PayrollError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).context("Failed to parse pipeline config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize pipeline config")
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tax_rate.is_finite() || !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(PayrollError::Config(format!(
                "tax_rate must be between 0 and 1, got {}",
                self.tax_rate
            )));
        }
        if !self.views.salary_threshold.is_finite() || !self.views.age_threshold.is_finite() {
            return Err(PayrollError::Config(
                "view thresholds must be finite numbers".to_owned(),
            ));
        }
        for (field, path) in [("output", &self.output), ("report", &self.report)] {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(PayrollError::Config(format!("{field} path is empty")));
            }
        }
        Ok(())
    }
}
