use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use payroll_clean::config::PipelineConfig;
use payroll_clean::payroll;
use payroll_clean::pipeline::{StageObserver, TracingObserver, load_source, run_pipeline};
use polars::prelude::DataFrame;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "payroll-clean",
    about = "Clean employee records, derive payroll and export CSV"
)]
pub struct Cli {
    /// Only log warnings and errors; do not print tables
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline (the default when no command is given)
    Run {
        /// Employee CSV to read. Defaults to the built-in reference records.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Cleaned CSV destination. Overrides the config file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a JSON pipeline configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Skip writing the cleaned CSV
        #[arg(long, conflicts_with = "output")]
        no_export: bool,
    },
    /// Write the built-in reference records to a CSV for editing
    Sample {
        /// Destination CSV
        #[arg(short, long, default_value = "employee_sample.csv")]
        output: PathBuf,
    },
}

/// Prints every table to stdout under its label.
struct ConsoleObserver;

impl StageObserver for ConsoleObserver {
    fn on_table(&self, label: &str, table: &DataFrame) {
        println!("{label}:\n{table}\n");
    }
}

pub fn run_command(command: Option<Commands>, quiet: bool) -> Result<()> {
    match command.unwrap_or(Commands::Run {
        input: None,
        output: None,
        config: None,
        report: None,
        no_export: false,
    }) {
        Commands::Run {
            input,
            output,
            config,
            report,
            no_export,
        } => handle_run(input, output, config, report, no_export, quiet),
        Commands::Sample { output } => handle_sample(output),
    }
}

fn handle_run(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    report: Option<PathBuf>,
    no_export: bool,
    quiet: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if output.is_some() {
        config.output = output;
    }
    if no_export {
        config.output = None;
    }
    if report.is_some() {
        config.report = report;
    }

    let (raw, source) = load_source(input.as_deref()).context("Failed to load employee data")?;

    let observer: &dyn StageObserver = if quiet {
        &TracingObserver
    } else {
        &ConsoleObserver
    };
    let run = run_pipeline(raw, source, &config, observer).context("Payroll pipeline failed")?;

    if !quiet {
        if let Some(path) = &run.report.output {
            println!("File saved: {}", path.display());
        }
        println!("{}", run.report.summary());
    }
    Ok(())
}

fn handle_sample(output: PathBuf) -> Result<()> {
    let sample = payroll::sample_table()?;
    payroll::export_raw(&sample, &output)
        .with_context(|| format!("Failed to write sample to {}", output.display()))?;
    println!("Sample written: {}", output.display());
    Ok(())
}
