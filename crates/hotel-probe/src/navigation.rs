//! Routing contexts.
//!
//! Pages hold a [`Navigator`] for the site they live on instead of sharing a
//! base type. [`ClientSite`] and [`AdminSite`] differ only in their base
//! address; both resolve a relative path and wait for DOM content.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::result::{HotelError, HotelResult};
use crate::wait::LoadState;

/// Where a navigation ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyPage {
    /// URL that was requested
    pub url: Url,
    /// Load state that was reached
    pub load_state: LoadState,
}

/// Resolve `path` under `base`, keeping any path prefix of the base.
///
/// `Url::join` would drop `/admin` from `http://host/admin` when given
/// `/rooms`, so segments are concatenated instead.
///
/// # Errors
///
/// Fails when the result is not a valid URL.
pub fn resolve(base: &Url, path: &str) -> HotelResult<Url> {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return Ok(base.clone());
    }
    let root = base.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{root}/{path}"))?)
}

/// Capability to open routes of one site
#[async_trait]
pub trait Navigator: Send + Sync + fmt::Debug {
    /// Site root
    fn base(&self) -> &Url;

    /// Open an absolute URL and wait for the ready state
    async fn open(&self, url: Url) -> HotelResult<ReadyPage>;

    /// Resolve a relative path against the site root
    fn resolve(&self, path: &str) -> HotelResult<Url> {
        resolve(self.base(), path)
    }

    /// Open a relative path
    async fn goto(&self, path: &str) -> HotelResult<ReadyPage> {
        let url = self.resolve(path)?;
        self.open(url).await
    }
}

#[derive(Clone)]
struct Route {
    site: &'static str,
    base: Url,
    driver: Arc<dyn PageDriver>,
    timeout: Duration,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("site", &self.site)
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl Route {
    fn new(
        site: &'static str,
        base: &str,
        driver: Arc<dyn PageDriver>,
        config: &SuiteConfig,
    ) -> HotelResult<Self> {
        let base = Url::parse(base).map_err(|e| {
            HotelError::config(format!("{site} base address `{base}` is not a URL: {e}"))
        })?;
        Ok(Self {
            site,
            base,
            driver,
            timeout: config.navigation_timeout(),
        })
    }

    async fn open(&self, url: Url) -> HotelResult<ReadyPage> {
        let load_state = LoadState::DomContentLoaded;
        tracing::info!(site = self.site, url = %url, "navigate");
        self.driver.goto(url.as_str(), load_state, self.timeout).await?;
        Ok(ReadyPage { url, load_state })
    }
}

/// Client-facing site
#[derive(Debug, Clone)]
pub struct ClientSite(Route);

impl ClientSite {
    /// Bind to the configured client base address
    ///
    /// # Errors
    ///
    /// Fails when the base address is not a URL.
    pub fn new(driver: Arc<dyn PageDriver>, config: &SuiteConfig) -> HotelResult<Self> {
        Route::new("client", &config.base_url, driver, config).map(Self)
    }
}

#[async_trait]
impl Navigator for ClientSite {
    fn base(&self) -> &Url {
        &self.0.base
    }

    async fn open(&self, url: Url) -> HotelResult<ReadyPage> {
        self.0.open(url).await
    }
}

/// Admin-facing site
#[derive(Debug, Clone)]
pub struct AdminSite(Route);

impl AdminSite {
    /// Bind to the configured admin base address
    ///
    /// # Errors
    ///
    /// Fails when the base address is not a URL.
    pub fn new(driver: Arc<dyn PageDriver>, config: &SuiteConfig) -> HotelResult<Self> {
        Route::new("admin", &config.admin_url(), driver, config).map(Self)
    }
}

#[async_trait]
impl Navigator for AdminSite {
    fn base(&self) -> &Url {
        &self.0.base
    }

    async fn open(&self, url: Url) -> HotelResult<ReadyPage> {
        self.0.open(url).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::FakePage;

    mod resolve_tests {
        use super::*;

        #[test]
        fn test_keeps_base_path() {
            let base = Url::parse("http://localhost:3000/admin").unwrap();
            assert_eq!(
                resolve(&base, "/rooms").unwrap().as_str(),
                "http://localhost:3000/admin/rooms"
            );
            assert_eq!(
                resolve(&base, "room/7").unwrap().as_str(),
                "http://localhost:3000/admin/room/7"
            );
        }

        #[test]
        fn test_empty_path_is_base() {
            let base = Url::parse("http://localhost:3000/admin").unwrap();
            assert_eq!(resolve(&base, "").unwrap(), base);
            assert_eq!(resolve(&base, "/").unwrap(), base);
        }

        #[test]
        fn test_root_base() {
            let base = Url::parse("http://localhost:3000").unwrap();
            assert_eq!(
                resolve(&base, "/").unwrap().as_str(),
                "http://localhost:3000/"
            );
            assert_eq!(
                resolve(&base, "/reservation/1").unwrap().as_str(),
                "http://localhost:3000/reservation/1"
            );
        }
    }

    mod site_tests {
        use super::*;

        #[tokio::test]
        async fn test_sites_share_contract_with_own_base() {
            let page = Arc::new(FakePage::new());
            let config = SuiteConfig::default();
            let client = ClientSite::new(page.clone(), &config).unwrap();
            let admin = AdminSite::new(page.clone(), &config).unwrap();

            let ready = client.goto("/").await.unwrap();
            assert_eq!(ready.load_state, LoadState::DomContentLoaded);
            admin.goto("/rooms").await.unwrap();

            assert_eq!(
                page.visited(),
                vec![
                    "http://localhost:3000/".to_string(),
                    "http://localhost:3000/admin/rooms".to_string(),
                ]
            );
        }

        #[test]
        fn test_bad_base_is_config_error() {
            let page = Arc::new(FakePage::new());
            let config = SuiteConfig::default().with_base_url("nope");
            let err = ClientSite::new(page, &config).unwrap_err();
            assert!(matches!(err, HotelError::Config { .. }));
        }
    }
}
