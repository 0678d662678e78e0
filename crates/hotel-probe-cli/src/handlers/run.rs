//! Run command handler

use hotel_probe::{all_scenarios, select, Scenario, SuiteConfig, SuiteReport, SuiteRunner};
use std::sync::Arc;

use crate::commands::{FormatArg, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_report, render_report_json, ProgressReporter};

/// Scenarios picked by the name filter and tag
///
/// # Errors
///
/// Fails when nothing matches, so a typo never reports a green run.
pub fn select_scenarios(args: &RunArgs) -> CliResult<Vec<Arc<dyn Scenario>>> {
    let selected = select(all_scenarios(), args.filter.as_deref(), args.tag.as_deref());
    if selected.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "no scenario matches filter {:?} and tag {:?}",
            args.filter.as_deref().unwrap_or("*"),
            args.tag.as_deref().unwrap_or("*"),
        )));
    }
    Ok(selected)
}

/// Layered configuration with the command-line overrides on top
pub fn resolve_config(args: &RunArgs) -> CliResult<SuiteConfig> {
    let mut config = SuiteConfig::load(args.config.as_deref())?;
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if let Some(headless) = args.headless_override() {
        config = config.with_headless(headless);
    }
    config.validate()?;
    Ok(config)
}

fn build_runner(config: SuiteConfig) -> CliResult<SuiteRunner> {
    let runner = SuiteRunner::from_config(Arc::new(config))?;
    #[cfg(feature = "browser")]
    let runner = runner.with_browser(Arc::new(hotel_probe::ChromiumLauncher::new()));
    Ok(runner)
}

/// Execute the run command
pub fn execute_run(cli: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let scenarios = select_scenarios(args)?;
    let config = resolve_config(args)?;
    let workers = config.workers;
    let runner = build_runner(config)?;

    let mut reporter = ProgressReporter::new(cli.color.should_color(), cli.verbosity.is_quiet());
    if !cfg!(feature = "browser") && scenarios.iter().any(|s| s.needs_browser()) {
        reporter.warning("built without the browser feature: UI scenarios will fail");
    }
    reporter.start_spinner(&format!(
        "running {} scenario(s) on {workers} worker(s)",
        scenarios.len()
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(runner.run(scenarios));
    reporter.finish();

    print_report(cli, args.format, &report)?;
    if report.all_passed() {
        Ok(())
    } else {
        Err(CliError::suite_failed(format!(
            "{} scenario(s) failed",
            report.failed_count()
        )))
    }
}

fn print_report(cli: &CliConfig, format: FormatArg, report: &SuiteReport) -> CliResult<()> {
    match format {
        FormatArg::Json => println!("{}", render_report_json(report)?),
        FormatArg::Text => {
            if cli.verbosity.is_quiet() && report.all_passed() {
                return Ok(());
            }
            print!("{}", render_report(report, cli.color.should_color()));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    fn run_args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["hotel-probe", "run"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Run(args) => args,
            other => panic!("unexpected {other:?}"),
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_filter_and_tag_combine() {
            let picked = select_scenarios(&run_args(&["--filter", "admin", "--tag", "smoke"]))
                .unwrap();
            let names: Vec<_> = picked.iter().map(|s| s.name()).collect();
            assert_eq!(names, vec!["admin-login"]);
        }

        #[test]
        fn test_empty_selection_is_an_error() {
            let err = select_scenarios(&run_args(&["--filter", "nothing-like-this"]))
                .err()
                .unwrap();
            assert!(matches!(err, CliError::InvalidArgument { .. }));
        }
    }

    mod config_tests {
        use super::*;
        use std::io::Write;

        #[test]
        fn test_flags_override_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.yaml");
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "workers: 2\nheadless: true").unwrap();

            let path = path.to_string_lossy().to_string();
            let config = resolve_config(&run_args(&["-c", &path, "-j", "5", "--headed"])).unwrap();
            assert_eq!(config.workers, 5);
            assert!(!config.headless);
        }

        #[test]
        fn test_zero_workers_rejected() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.yaml");
            std::fs::write(&path, "workers: 1\n").unwrap();

            let path = path.to_string_lossy().to_string();
            let err = resolve_config(&run_args(&["-c", &path, "-j", "0"])).err().unwrap();
            assert!(err.to_string().contains("workers"));
        }
    }
}
