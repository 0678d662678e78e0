//! Hotel Probe: page objects and API checks for a hotel booking site
//!
//! Scenarios script user journeys across the admin panel, the public booking
//! site and the room REST API. They never touch selectors directly: every
//! interaction goes through a page object, which composes components, which
//! ask the selector registry for their locators.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   HOTEL PROBE Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │───►│ Page       │───►│ Component  │            │
//! │   │ (runner)   │    │ Object     │    │            │            │
//! │   └─────┬──────┘    └────────────┘    └─────┬──────┘            │
//! │         │                                   ▼                   │
//! │         │           ┌────────────┐    ┌────────────┐            │
//! │         └──────────►│ RoomApi    │    │ Selector   │            │
//! │                     │ (reqwest)  │    │ Registry   │            │
//! │                     └────────────┘    └─────┬──────┘            │
//! │                                             ▼                   │
//! │                                       ┌────────────┐            │
//! │                                       │ PageDriver │            │
//! │                                       │ CDP / fake │            │
//! │                                       └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use hotel_probe::{all_scenarios, select, SuiteConfig, SuiteRunner};
//! use std::sync::Arc;
//!
//! # async fn demo() -> hotel_probe::HotelResult<()> {
//! let config = Arc::new(SuiteConfig::load(None)?);
//! let runner = SuiteRunner::from_config(config)?;
//! let report = runner.run(select(all_scenarios(), None, Some("api"))).await;
//! assert!(report.all_passed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod api;
mod assertion;
mod config;
mod dates;
mod driver;
mod fixture;
mod locator;
mod navigation;
mod network;
mod result;
mod room;
mod runner;
mod scenario;
mod tab;
mod wait;

/// Bounded regions of a page: login form, room rows and cards, booking card
pub mod components;

/// Page objects for the admin and client sites
pub mod pages;

/// The hotel booking scenarios
pub mod scenarios;

/// Selector and feature registry
pub mod selectors;

/// Scripted in-memory driver for tests
#[allow(clippy::missing_panics_doc)]
pub mod mock;

/// Chromium driver over CDP
#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc, clippy::doc_markdown)]
pub mod cdp;

pub use api::RoomApi;
pub use assertion::{expect, expect_contains, expect_eq, expect_some, expect_true, Expect};
pub use config::{ConfigView, EditAddressing, SuiteConfig, DEFAULT_BASE_URL, DEFAULT_ROOMS_PATH};
pub use dates::{us_date, Stay};
pub use driver::{DriverConfig, PageDriver};
pub use fixture::{with_fixture, AdminAuth, AdminSession, Fixture, FixtureState};
pub use locator::{ElementAction, ElementState, Locator, Query, Selector, Step, DEFAULT_TIMEOUT_MS};
pub use navigation::{resolve, AdminSite, ClientSite, Navigator, ReadyPage};
pub use network::{
    CapturedRequest, HttpMethod, ObserverId, RequestFilter, RequestObserver, UrlPattern,
};
pub use result::{FailureKind, HotelError, HotelResult};
pub use room::{unique_room_name, NewRoom, Room, RoomPatch, RoomType};
pub use runner::{ScenarioOutcome, SuiteReport, SuiteRunner};
pub use scenario::{all_scenarios, select, step, Scenario, ScenarioContext, ScenarioInfo};
pub use tab::{Tab, TabFactory};
pub use wait::{
    wait_for_value, wait_until, LoadState, DEFAULT_NAVIGATION_TIMEOUT_MS,
    DEFAULT_POLL_INTERVAL_MS, NETWORK_IDLE_THRESHOLD_MS,
};

#[cfg(feature = "browser")]
pub use cdp::{ChromiumDriver, ChromiumLauncher};
