//! hotel-probe: run the hotel booking end-to-end suite
//!
//! ```bash
//! hotel-probe run                    # Every scenario
//! hotel-probe run --tag smoke        # Smoke scenarios only
//! hotel-probe list --format json     # Scenario catalogue
//! ```

use clap::Parser;
use hotel_probe_cli::{handlers, init_logging, Cli, CliConfig, CliResult, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_cli(&cli);
    init_logging(&config);

    match cli.command {
        Commands::List(args) => handlers::execute_list(&args),
        Commands::Run(args) => handlers::execute_run(&config, &args),
        Commands::Config(args) => handlers::execute_config(&args),
    }
}
