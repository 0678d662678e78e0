//! Hotel Probe CLI library
//!
//! Command-line interface for the hotel booking end-to-end suite.
//!
//! ## Usage
//!
//! ```bash
//! hotel-probe list --tag api            # Show the API scenarios
//! hotel-probe run --filter admin -j 2   # Admin scenarios, two at a time
//! hotel-probe run --format json         # Machine-readable report on stdout
//! hotel-probe config -c suite.yaml      # Effective configuration
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, FormatArg, ListArgs, LogFormatArg, RunArgs,
};
pub use config::{init_logging, CliConfig, ColorChoice, LogFormat, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_list, render_report, render_report_json, ProgressReporter};
