//! Suite runner.
//!
//! Runs selected scenarios with at most `workers` in flight. Every browser
//! scenario gets a fresh tab from the [`TabFactory`] and the tab is closed
//! when the scenario ends, pass, fail or panic. Scenarios share nothing but the
//! read-only configuration and the API client.

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::api::RoomApi;
use crate::config::SuiteConfig;
use crate::result::{FailureKind, HotelError, HotelResult};
use crate::scenario::{Scenario, ScenarioContext};
use crate::tab::{Tab, TabFactory};

/// Closes the tab it holds. Dropped without [`TabGuard::close`], as when the
/// scenario panics, the close is handed to the runtime instead.
struct TabGuard(Option<Tab>);

impl TabGuard {
    async fn close(mut self) {
        if let Some(tab) = self.0.take() {
            if let Err(e) = tab.close().await {
                tracing::warn!(error = %e, "closing tab failed");
            }
        }
    }
}

impl Drop for TabGuard {
    fn drop(&mut self) {
        let Some(tab) = self.0.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = tab.close().await {
                        tracing::warn!(error = %e, "closing abandoned tab failed");
                    }
                });
            }
            Err(_) => tracing::warn!("tab abandoned outside the runtime"),
        }
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Whether it passed
    pub passed: bool,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure class if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    /// Steps enclosing the failure, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    /// Create a passing outcome
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            kind: None,
            steps: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Create a failing outcome from the error that stopped the scenario
    #[must_use]
    pub fn fail(name: impl Into<String>, error: &HotelError) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.to_string()),
            kind: Some(error.kind()),
            steps: error.step_path().into_iter().map(str::to_string).collect(),
            duration_ms: 0,
        }
    }

    /// Set duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }
}

/// Outcomes of one suite run, in selection order
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Per-scenario outcomes
    pub outcomes: Vec<ScenarioOutcome>,
    /// Wall time of the whole run in milliseconds
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Check if every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.total() - self.passed_count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed).collect()
    }
}

/// Parallel scenario runner
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    config: Arc<SuiteConfig>,
    api: RoomApi,
    browser: Option<Arc<dyn TabFactory>>,
}

impl SuiteRunner {
    /// Runner for API-only scenarios
    #[must_use]
    pub const fn new(config: Arc<SuiteConfig>, api: RoomApi) -> Self {
        Self {
            config,
            api,
            browser: None,
        }
    }

    /// Runner built from configuration alone
    ///
    /// # Errors
    ///
    /// Fails when the API address is invalid.
    pub fn from_config(config: Arc<SuiteConfig>) -> HotelResult<Self> {
        let api = RoomApi::new(&config)?;
        Ok(Self::new(config, api))
    }

    /// Open tabs for browser scenarios through `browser`
    #[must_use]
    pub fn with_browser(mut self, browser: Arc<dyn TabFactory>) -> Self {
        self.browser = Some(browser);
        self
    }

    /// Effective worker limit, never below one
    #[must_use]
    pub fn workers(&self) -> usize {
        self.config.workers.max(1)
    }

    /// Run every scenario and report in the order given
    pub async fn run(&self, scenarios: Vec<Arc<dyn Scenario>>) -> SuiteReport {
        let start = Instant::now();
        let names: Vec<&'static str> = scenarios.iter().map(|s| s.name()).collect();
        let slots = Arc::new(Semaphore::new(self.workers()));
        tracing::info!(
            scenarios = scenarios.len(),
            workers = self.workers(),
            "suite started"
        );

        let mut set = JoinSet::new();
        for (index, scenario) in scenarios.into_iter().enumerate() {
            let runner = self.clone();
            let slots = Arc::clone(&slots);
            set.spawn(async move {
                let outcome = match slots.acquire_owned().await {
                    Ok(_permit) => runner.run_one(scenario.as_ref()).await,
                    Err(_) => ScenarioOutcome::fail(
                        scenario.name(),
                        &HotelError::driver("worker pool closed before the scenario started"),
                    ),
                };
                (index, outcome)
            });
        }

        let mut collected: Vec<Option<ScenarioOutcome>> = vec![None; names.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, outcome)) => collected[index] = Some(outcome),
                Err(e) => tracing::error!(error = %e, "scenario task aborted"),
            }
        }

        let outcomes = collected
            .into_iter()
            .zip(names)
            .map(|(outcome, name)| {
                outcome.unwrap_or_else(|| {
                    ScenarioOutcome::fail(name, &HotelError::driver("scenario task panicked"))
                })
            })
            .collect();
        let report = SuiteReport {
            outcomes,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        tracing::info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            duration_ms = report.duration_ms,
            "suite finished"
        );
        report
    }

    /// Run one scenario in its own tab
    pub async fn run_one(&self, scenario: &dyn Scenario) -> ScenarioOutcome {
        let name = scenario.name();
        let span = tracing::info_span!("scenario", name);
        async {
            let start = Instant::now();
            let result = self.execute(scenario).await;
            let outcome = match result {
                Ok(()) => {
                    tracing::info!("scenario passed");
                    ScenarioOutcome::pass(name)
                }
                Err(e) => {
                    tracing::warn!(error = %e, kind = %e.kind(), "scenario failed");
                    ScenarioOutcome::fail(name, &e)
                }
            };
            outcome.with_duration(start.elapsed())
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, scenario: &dyn Scenario) -> HotelResult<()> {
        let tab = if scenario.needs_browser() {
            let browser = self.browser.as_ref().ok_or_else(|| {
                HotelError::config("scenario needs a browser but the runner has none")
            })?;
            Some(browser.open_tab(Arc::clone(&self.config)).await?)
        } else {
            None
        };

        let guard = TabGuard(tab.clone());
        let ctx = ScenarioContext::new(Arc::clone(&self.config), self.api.clone(), tab);
        let result = scenario.run(&ctx).await;
        drop(ctx);
        guard.close().await;
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::FakeBrowser;
    use crate::scenario::step;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Scripted {
        name: &'static str,
        browser: bool,
        fail: bool,
        panic: bool,
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                browser: false,
                fail: false,
                panic: false,
                in_flight: Arc::new(AtomicUsize::new(0)),
                peak: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Scenario for Scripted {
        fn name(&self) -> &'static str {
            self.name
        }

        fn tags(&self) -> &'static [&'static str] {
            &["scripted"]
        }

        fn needs_browser(&self) -> bool {
            self.browser
        }

        async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.browser {
                ctx.tab()?;
            }
            assert!(!self.panic, "scenario blew up");
            if self.fail {
                return step("check price", async {
                    Err(HotelError::assertion("room price", 888, 0))
                })
                .await;
            }
            Ok(())
        }
    }

    fn runner(workers: usize) -> SuiteRunner {
        let config = SuiteConfig {
            workers,
            ..SuiteConfig::default()
        };
        SuiteRunner::from_config(Arc::new(config)).unwrap()
    }

    mod report_tests {
        use super::*;

        #[tokio::test]
        async fn test_outcomes_keep_selection_order() {
            let mut failing = Scripted::new("b");
            failing.fail = true;
            let scenarios: Vec<Arc<dyn Scenario>> = vec![
                Arc::new(Scripted::new("a")),
                Arc::new(failing),
                Arc::new(Scripted::new("c")),
            ];
            let report = runner(3).run(scenarios).await;
            let names: Vec<_> = report.outcomes.iter().map(|o| o.name.as_str()).collect();
            assert_eq!(names, vec!["a", "b", "c"]);
            assert_eq!(report.passed_count(), 2);
            assert_eq!(report.failed_count(), 1);
            assert!(!report.all_passed());

            let failure = report.failures()[0];
            assert_eq!(failure.kind, Some(FailureKind::Assertion));
            assert_eq!(failure.steps, vec!["check price"]);
            assert!(failure.error.as_deref().unwrap().contains("888"));
        }

        #[tokio::test]
        async fn test_report_serializes() {
            let report = runner(1).run(vec![Arc::new(Scripted::new("a"))]).await;
            let json = serde_json::to_value(&report).unwrap();
            assert_eq!(json["outcomes"][0]["name"], "a");
            assert_eq!(json["outcomes"][0]["passed"], true);
            assert!(json["outcomes"][0].get("error").is_none());
        }
    }

    mod concurrency_tests {
        use super::*;

        fn scripted(
            count: usize,
            in_flight: &Arc<AtomicUsize>,
            peak: &Arc<AtomicUsize>,
        ) -> Vec<Arc<dyn Scenario>> {
            const NAMES: [&str; 6] = ["p0", "p1", "p2", "p3", "p4", "p5"];
            NAMES[..count]
                .iter()
                .map(|&name| {
                    let mut scenario = Scripted::new(name);
                    scenario.in_flight = Arc::clone(in_flight);
                    scenario.peak = Arc::clone(peak);
                    Arc::new(scenario) as Arc<dyn Scenario>
                })
                .collect()
        }

        #[tokio::test]
        async fn test_worker_limit_bounds_parallelism() {
            let in_flight = Arc::new(AtomicUsize::new(0));
            let peak = Arc::new(AtomicUsize::new(0));
            let report = runner(2).run(scripted(6, &in_flight, &peak)).await;
            assert!(report.all_passed());
            assert!(peak.load(Ordering::SeqCst) <= 2);
        }

        #[tokio::test]
        async fn test_zero_workers_still_runs() {
            let in_flight = Arc::new(AtomicUsize::new(0));
            let peak = Arc::new(AtomicUsize::new(0));
            let runner = runner(0);
            assert_eq!(runner.workers(), 1);
            let report = runner.run(scripted(2, &in_flight, &peak)).await;
            assert_eq!(report.total(), 2);
            assert_eq!(peak.load(Ordering::SeqCst), 1);
        }
    }

    mod browser_tests {
        use super::*;

        #[tokio::test]
        async fn test_each_browser_scenario_gets_own_closed_tab() {
            let browser = Arc::new(FakeBrowser::default());
            let mut first = Scripted::new("ui-1");
            first.browser = true;
            let mut second = Scripted::new("ui-2");
            second.browser = true;
            let report = runner(2)
                .with_browser(browser.clone())
                .run(vec![
                    Arc::new(first),
                    Arc::new(second),
                    Arc::new(Scripted::new("api")),
                ])
                .await;
            assert!(report.all_passed());
            let opened = browser.opened();
            assert_eq!(opened.len(), 2);
            assert!(opened.iter().all(|page| page.is_closed()));
        }

        #[tokio::test]
        async fn test_browser_scenario_without_browser_fails() {
            let mut scenario = Scripted::new("ui");
            scenario.browser = true;
            let report = runner(1).run(vec![Arc::new(scenario)]).await;
            let outcome = &report.outcomes[0];
            assert!(!outcome.passed);
            assert_eq!(outcome.kind, Some(FailureKind::Infrastructure));
        }

        #[tokio::test]
        async fn test_panicking_scenario_still_closes_tab() {
            let browser = Arc::new(FakeBrowser::default());
            let mut scenario = Scripted::new("ui-panics");
            scenario.browser = true;
            scenario.panic = true;
            let report = runner(1)
                .with_browser(browser.clone())
                .run(vec![Arc::new(scenario)])
                .await;
            let outcome = &report.outcomes[0];
            assert!(!outcome.passed);
            assert!(outcome.error.as_deref().unwrap().contains("panicked"));

            let page = browser.opened().remove(0);
            for _ in 0..50 {
                if page.is_closed() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            assert!(page.is_closed());
        }
    }
}
