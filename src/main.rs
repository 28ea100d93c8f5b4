//! # payroll-clean Entry Point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Initialise logging (tracing)
//!   └─> Run the command (default: full pipeline on the reference records)
//! ```
//!
//! ```bash
//! payroll-clean                                  # reference run, writes cleaned_employee_data.csv
//! payroll-clean run --input staff.csv --report run.json
//! payroll-clean sample --output staff.csv
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Tables and results go to stdout

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    payroll_clean::logging::init(cli.quiet)?;

    cli::run_command(cli.command, cli.quiet)
}
