//! `PageDriver` - abstract page automation seam.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PageDriver (object-safe async trait)                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────────────────┐        ┌──────────────────────┐    │
//! │  │  ChromiumDriver      │        │  FakePage            │    │
//! │  │  (feature = browser) │        │  (mock module)       │    │
//! │  │  CDP via chromiumoxide│       │  in-memory DOM model │    │
//! │  └──────────────────────┘        └──────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Drivers only know how to resolve a [`Query`] and run primitive actions on
//! it. Waiting, strictness and defaults for absent elements live in
//! [`Locator`](crate::locator::Locator), so every driver gets the same
//! semantics for free.

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

use crate::config::SuiteConfig;
use crate::locator::{ElementAction, Query};
use crate::network::{CapturedRequest, ObserverId, RequestFilter};
use crate::result::HotelResult;
use crate::wait::LoadState;

/// Abstract driver for one browser tab.
///
/// # Implementations
///
/// - `ChromiumDriver` - real Chromium over CDP, behind the `browser` feature
/// - [`FakePage`](crate::mock::FakePage) - scripted in-memory page for tests
#[async_trait]
pub trait PageDriver: Send + Sync + Debug {
    /// Navigate to an absolute URL and wait for the load state
    async fn goto(&self, url: &str, wait_until: LoadState, timeout: Duration) -> HotelResult<()>;

    /// Current document URL
    async fn current_url(&self) -> HotelResult<String>;

    /// Number of elements the query resolves to
    async fn count(&self, query: &Query) -> HotelResult<usize>;

    /// Text content of the first match, `None` when nothing matches
    async fn text_content(&self, query: &Query) -> HotelResult<Option<String>>;

    /// Text content of every match, in document order
    async fn all_text_contents(&self, query: &Query) -> HotelResult<Vec<String>>;

    /// Attribute of the first match, `None` when absent
    async fn attribute(&self, query: &Query, name: &str) -> HotelResult<Option<String>>;

    /// Whether the first match is rendered and visible
    async fn is_visible(&self, query: &Query) -> HotelResult<bool>;

    /// Perform an action on the single match
    async fn perform(&self, query: &Query, action: &ElementAction) -> HotelResult<()>;

    /// Start recording requests that match a filter
    async fn observe_requests(&self, filter: &RequestFilter) -> HotelResult<ObserverId>;

    /// Requests recorded by an observer so far
    async fn captured_requests(&self, observer: ObserverId) -> HotelResult<Vec<CapturedRequest>>;

    /// Release the tab
    async fn close(&self) -> HotelResult<()> {
        Ok(())
    }
}

/// Browser configuration for drivers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Timeout for navigation
    pub navigation_timeout: Duration,
    /// Executable path override
    pub executable_path: Option<String>,
    /// Pass `--no-sandbox` (containers)
    pub no_sandbox: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            navigation_timeout: Duration::from_secs(30),
            executable_path: None,
            no_sandbox: false,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive browser settings from the suite configuration
    #[must_use]
    pub fn from_suite(config: &SuiteConfig) -> Self {
        Self {
            headless: config.headless,
            navigation_timeout: config.navigation_timeout(),
            executable_path: config.chromium_path.clone(),
            no_sandbox: config.no_sandbox,
            ..Self::default()
        }
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set navigation timeout
    #[must_use]
    pub const fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }
}
