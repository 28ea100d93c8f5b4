//! Logging setup for payroll-clean.
//!
//! Logs go to stderr and, when the platform data directory is usable, to a
//! daily-rolling file. Stdout is left to the CLI for table dumps.
//!
//! ## Usage
//!
//! ```no_run
//! use payroll_clean::logging;
//!
//! // Initialize once at startup
//! logging::init(false).expect("Failed to initialize logging");
//!
//! tracing::info!("Payroll run started");
//! ```
//!
//! `RUST_LOG` overrides the default level (`info`, or `warn` when quiet).

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const APP_DIR: &str = "payroll-clean";

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/payroll-clean/logs`
/// - macOS: `~/Library/Application Support/payroll-clean/logs`
/// - Linux: `~/.local/share/payroll-clean/logs`
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;
    Ok(base_dir.join(APP_DIR).join("logs"))
}

fn ensure_log_dir() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }
    Ok(log_dir)
}

/// Default filter directive for the given verbosity.
pub fn default_level(quiet: bool) -> &'static str {
    if quiet { "warn" } else { "info" }
}

/// Initializes console logging plus, if possible, a rolling log file.
///
/// A missing or unwritable data directory is not fatal: logging falls back
/// to the console only and says so.
///
/// # Errors
///
/// Returns error if the filter cannot be built or a global subscriber is
/// already installed.
pub fn init(quiet: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level(quiet)))
        .context("Failed to create env filter")?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    let file_setup = ensure_log_dir().and_then(|log_dir| {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix(APP_DIR)
            .filename_suffix("log")
            .build(&log_dir)
            .context("Failed to create log file appender")?;
        Ok((log_dir, appender))
    });

    let (file_layer, log_dir, file_error) = match file_setup {
        Ok((log_dir, appender)) => {
            let layer = fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(appender)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(log_dir), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(console_layer.with_filter(env_filter))
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    match (log_dir, file_error) {
        (Some(dir), _) => tracing::debug!("Logging initialized, log directory: {}", dir.display()),
        (None, Some(e)) => tracing::warn!("File logging disabled: {e:#}"),
        (None, None) => {}
    }

    Ok(())
}
