//! Output formatting and progress reporting

use console::{style, Style, Term};
use hotel_probe::{ScenarioInfo, SuiteReport};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::time::Duration;

use crate::error::CliResult;

/// Progress reporter for a suite run. Writes to stderr.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Show a spinner while scenarios run
    pub fn start_spinner(&mut self, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        self.progress_bar = Some(pb);
    }

    /// Remove the spinner
    pub fn finish(&mut self) {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }
}

/// Per-scenario lines and a summary for a finished run
#[must_use]
pub fn render_report(report: &SuiteReport, use_color: bool) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        let mark = match (outcome.passed, use_color) {
            (true, true) => style("✓").green().bold().to_string(),
            (false, true) => style("✗").red().bold().to_string(),
            (true, false) => "PASS".to_string(),
            (false, false) => "FAIL".to_string(),
        };
        let _ = writeln!(out, "{mark} {} ({}ms)", outcome.name, outcome.duration_ms);
        if let Some(error) = &outcome.error {
            if let Some(kind) = outcome.kind {
                let _ = writeln!(out, "    kind: {kind}");
            }
            for line in error.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
    }

    let seconds = Duration::from_millis(report.duration_ms).as_secs_f64();
    let (passed, failed, total) = (report.passed_count(), report.failed_count(), report.total());
    if use_color {
        let status = if failed > 0 {
            Style::new().red().bold().apply_to("FAILED")
        } else {
            Style::new().green().bold().apply_to("PASSED")
        };
        let _ = writeln!(
            out,
            "\n{status} {total} scenarios in {seconds:.2}s ({passed} passed, {failed} failed)"
        );
    } else {
        let status = if failed > 0 { "FAILED" } else { "PASSED" };
        let _ = writeln!(
            out,
            "\n{status} {total} scenarios in {seconds:.2}s ({passed} passed, {failed} failed)"
        );
    }
    out
}

/// Report as pretty JSON
///
/// # Errors
///
/// Fails only if serialization fails.
pub fn render_report_json(report: &SuiteReport) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One line per scenario: name, tags, browser need
#[must_use]
pub fn render_list(scenarios: &[ScenarioInfo]) -> String {
    let width = scenarios.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for info in scenarios {
        let browser = if info.needs_browser { "browser" } else { "api-only" };
        let _ = writeln!(
            out,
            "{:<width$}  {:<8}  {}",
            info.name,
            browser,
            info.tags.join(",")
        );
    }
    out
}
