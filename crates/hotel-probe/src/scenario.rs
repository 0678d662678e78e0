//! Scenario contract.
//!
//! A scenario is a fixed sequence of page workflows and assertions. Each
//! workflow call is wrapped in [`step`] so a failure names the step it
//! happened in, and runs inside its own tracing span.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

use crate::api::RoomApi;
use crate::config::SuiteConfig;
use crate::result::{HotelError, HotelResult};
use crate::scenarios;
use crate::tab::Tab;

/// One user journey
#[async_trait]
pub trait Scenario: Send + Sync + fmt::Debug {
    /// Unique name, used for filtering and reports
    fn name(&self) -> &'static str;

    /// Tags for selection
    fn tags(&self) -> &'static [&'static str];

    /// Whether the runner must open a tab
    fn needs_browser(&self) -> bool {
        true
    }

    /// Run to completion or to the first failure
    ///
    /// # Errors
    ///
    /// Returns the failure that stopped the journey.
    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()>;
}

/// Listing entry for a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioInfo {
    /// Scenario name
    pub name: &'static str,
    /// Tags
    pub tags: &'static [&'static str],
    /// Needs a browser tab
    pub needs_browser: bool,
}

impl ScenarioInfo {
    /// Describe a scenario
    #[must_use]
    pub fn of(scenario: &dyn Scenario) -> Self {
        Self {
            name: scenario.name(),
            tags: scenario.tags(),
            needs_browser: scenario.needs_browser(),
        }
    }
}

/// What a running scenario can reach
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    config: Arc<SuiteConfig>,
    api: RoomApi,
    tab: Option<Tab>,
}

impl ScenarioContext {
    /// Context with an optional tab
    #[must_use]
    pub const fn new(config: Arc<SuiteConfig>, api: RoomApi, tab: Option<Tab>) -> Self {
        Self { config, api, tab }
    }

    /// Suite configuration
    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Room API client
    #[must_use]
    pub const fn api(&self) -> &RoomApi {
        &self.api
    }

    /// The scenario's tab
    ///
    /// # Errors
    ///
    /// Fails when the scenario was started without a browser.
    pub fn tab(&self) -> HotelResult<&Tab> {
        self.tab
            .as_ref()
            .ok_or_else(|| HotelError::config("scenario needs a browser tab but none was opened"))
    }
}

/// Run one named workflow step
///
/// # Errors
///
/// Wraps any failure in [`HotelError::StepFailed`] carrying `name`.
pub async fn step<T>(name: &str, work: impl Future<Output = HotelResult<T>>) -> HotelResult<T> {
    let span = tracing::info_span!("step", name);
    match work.instrument(span).await {
        Ok(value) => Ok(value),
        Err(source) => {
            tracing::warn!(step = name, error = %source, "step failed");
            Err(HotelError::StepFailed {
                step: name.to_string(),
                source: Box::new(source),
            })
        }
    }
}

/// Every scenario in the suite, in a stable order
#[must_use]
pub fn all_scenarios() -> Vec<Arc<dyn Scenario>> {
    vec![
        Arc::new(scenarios::AdminLogin),
        Arc::new(scenarios::AdminCreateRoom),
        Arc::new(scenarios::AdminEditRoom),
        Arc::new(scenarios::FirstNameValidation),
        Arc::new(scenarios::BookedDatesConflict),
        Arc::new(scenarios::ClientBooking),
        Arc::new(scenarios::ApiRoundTrip),
        Arc::new(scenarios::ApiUpdateConsistency),
        Arc::new(scenarios::UnknownNameLookup),
    ]
}

/// Scenarios whose name contains `filter` and which carry `tag`
#[must_use]
pub fn select(
    scenarios: Vec<Arc<dyn Scenario>>,
    filter: Option<&str>,
    tag: Option<&str>,
) -> Vec<Arc<dyn Scenario>> {
    scenarios
        .into_iter()
        .filter(|s| filter.map_or(true, |f| s.name().contains(f)))
        .filter(|s| tag.map_or(true, |t| s.tags().contains(&t)))
        .collect()
}
