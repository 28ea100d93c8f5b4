//! Centralized error handling for payroll-clean.
//!
//! Every stage of the employee pipeline returns [`Result`], whose error side is
//! [`PayrollError`]. Value-level problems (an unparsable salary, a missing
//! name) are not errors: the cleaner resolves them to nulls and then to
//! defaults. Only the conditions below reach the caller:
//!
//! ```
//! use payroll_clean::error::PayrollError;
//!
//! fn describe(err: &PayrollError) -> &'static str {
//!     match err {
//!         PayrollError::EmptyTable(_) => "nothing to rank",
//!         PayrollError::File { .. } => "check the path",
//!         PayrollError::MissingAges => "no age to average",
//!         _ => "pipeline failure",
//!     }
//! }
//! ```
//!
//! ## Context Extension Trait
//!
//! [`ResultExt`] adds `.context()` to any result whose error converts into
//! [`PayrollError`]:
//!
//! ```no_run
//! use payroll_clean::error::ResultExt as _;
//!
//! fn load() -> payroll_clean::error::Result<String> {
//!     std::fs::read_to_string("pipeline.json").context("Failed to read pipeline config")
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

/// Main error type for payroll pipeline operations.
#[derive(Debug)]
pub enum PayrollError {
    /// I/O errors without a specific file attached
    Io(std::io::Error),

    /// Reading or writing a specific file failed
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Polars failures and other table processing errors
    DataProcessing(String),

    /// A required column is absent or has an unusable type
    Schema(String),

    /// Invalid pipeline configuration
    Config(String),

    /// A query that needs at least one row ran on an empty table
    EmptyTable(&'static str),

    /// Every age is null so no mean exists to impute with
    MissingAges,

    /// Strict income mode found salary or bonus values that could not be used
    MissingIncome { column: &'static str, rows: usize },

    /// The deriver was handed a table that has not been through the cleaner
    NotCleaned(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for PayrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::File { path, source } => write!(f, "I/O error on {}: {source}", path.display()),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Schema(msg) => write!(f, "Schema error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::EmptyTable(query) => write!(f, "Empty table: {query} needs at least one row"),
            Self::MissingAges => write!(f, "Cannot impute age: every age value is missing"),
            Self::MissingIncome { column, rows } => {
                write!(f, "Column '{column}' has {rows} missing or unparsable value(s)")
            }
            Self::NotCleaned(msg) => write!(f, "Table has not been cleaned: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PayrollError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::File { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PayrollError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PayrollError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for PayrollError {
    fn from(err: polars::error::PolarsError) -> Self {
        match err {
            polars::error::PolarsError::ColumnNotFound(msg) => Self::Schema(msg.to_string()),
            other => Self::DataProcessing(other.to_string()),
        }
    }
}

/// Result type alias for payroll operations.
pub type Result<T> = std::result::Result<T, PayrollError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PayrollError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PayrollError = e.into();
            PayrollError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PayrollError = e.into();
            PayrollError::Other(format!("{}: {}", f(), err))
        })
    }
}
