//! One isolated browser tab bound to the suite configuration.

use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::locator::{Locator, Selector};
use crate::navigation::{AdminSite, ClientSite};
use crate::network::{RequestFilter, RequestObserver};
use crate::result::HotelResult;
use crate::wait::{wait_for_value, DEFAULT_POLL_INTERVAL_MS};

/// A driver plus the configuration every page on it needs
#[derive(Clone)]
pub struct Tab {
    driver: Arc<dyn PageDriver>,
    config: Arc<SuiteConfig>,
}

impl fmt::Debug for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tab")
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}

impl Tab {
    /// Bind a driver to a configuration
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, config: Arc<SuiteConfig>) -> Self {
        Self { driver, config }
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> Arc<dyn PageDriver> {
        Arc::clone(&self.driver)
    }

    /// Shared configuration
    #[must_use]
    pub const fn config(&self) -> &Arc<SuiteConfig> {
        &self.config
    }

    /// Locator for the whole page, using the configured action budget
    #[must_use]
    pub fn page(&self) -> Locator {
        Locator::page(self.driver()).with_timeout(self.config.action_timeout())
    }

    /// Locator for a selector from the page root
    #[must_use]
    pub fn locator(&self, selector: Selector) -> Locator {
        self.page().locator(selector)
    }

    /// Client routing context
    ///
    /// # Errors
    ///
    /// Fails when the client base address is invalid.
    pub fn client(&self) -> HotelResult<ClientSite> {
        ClientSite::new(self.driver(), &self.config)
    }

    /// Admin routing context
    ///
    /// # Errors
    ///
    /// Fails when the admin base address is invalid.
    pub fn admin(&self) -> HotelResult<AdminSite> {
        AdminSite::new(self.driver(), &self.config)
    }

    /// Current document URL
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub async fn current_url(&self) -> HotelResult<String> {
        self.driver.current_url().await
    }

    /// Wait until the URL matches, within the navigation budget
    ///
    /// # Errors
    ///
    /// Times out naming the pattern.
    pub async fn wait_for_url(&self, pattern: &Regex) -> HotelResult<String> {
        let url = wait_for_value(
            "reach",
            pattern.as_str(),
            self.config.navigation_timeout(),
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            || async {
                let url = self.driver.current_url().await?;
                Ok::<_, crate::result::HotelError>(pattern.is_match(&url).then_some(url))
            },
        )
        .await?;
        tracing::debug!(url = %url, "url reached");
        Ok(url)
    }

    /// Install a request observer before a triggering action
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub async fn observe(&self, filter: RequestFilter) -> HotelResult<RequestObserver> {
        RequestObserver::install(self.driver(), filter).await
    }

    /// Release the tab
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub async fn close(&self) -> HotelResult<()> {
        self.driver.close().await
    }
}

/// Opens isolated tabs, one per scenario
#[async_trait]
pub trait TabFactory: Send + Sync + fmt::Debug {
    /// Open a fresh tab
    async fn open_tab(&self, config: Arc<SuiteConfig>) -> HotelResult<Tab>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{FakeElement, FakePage};
    use crate::result::HotelError;

    fn tab_with(page: Arc<FakePage>, config: SuiteConfig) -> Tab {
        Tab::new(page, Arc::new(config))
    }

    #[tokio::test]
    async fn test_wait_for_url_matches() {
        let page = Arc::new(FakePage::new());
        page.set_url("http://localhost:3000/admin/rooms");
        let tab = tab_with(page, SuiteConfig::default());
        let url = tab
            .wait_for_url(&Regex::new(r"/admin/rooms").unwrap())
            .await
            .unwrap();
        assert!(url.ends_with("/admin/rooms"));
    }

    #[tokio::test]
    async fn test_wait_for_url_times_out() {
        let page = Arc::new(FakePage::new());
        let mut config = SuiteConfig::default();
        config.navigation_timeout_ms = 30;
        let tab = tab_with(page, config);
        let err = tab
            .wait_for_url(&Regex::new(r"/admin/rooms").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, HotelError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_locators_inherit_action_budget() {
        let page = Arc::new(FakePage::new());
        page.add("#rooms", FakeElement::visible(""));
        let tab = tab_with(page, SuiteConfig::default().with_action_timeout_ms(1234));
        let rooms = tab.locator(Selector::css("#rooms"));
        assert_eq!(rooms.timeout(), Duration::from_millis(1234));
        assert!(rooms.is_visible().await.unwrap());
    }

    #[tokio::test]
    async fn test_close_reaches_driver() {
        let page = Arc::new(FakePage::new());
        let tab = tab_with(page.clone(), SuiteConfig::default());
        tab.close().await.unwrap();
        assert!(page.is_closed());
    }
}
