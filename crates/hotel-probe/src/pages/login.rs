use super::{route_pattern, AdminRoomsPage, PageObject, UrlMatcher};
use crate::components::LoginForm;
use crate::navigation::{AdminSite, Navigator, ReadyPage};
use crate::result::HotelResult;
use crate::tab::Tab;

/// Admin login screen at the admin base address
#[derive(Debug, Clone)]
pub struct AdminLoginPage {
    tab: Tab,
    site: AdminSite,
    form: LoginForm,
    pattern: String,
}

impl AdminLoginPage {
    /// Login page for the tab's admin site
    ///
    /// # Errors
    ///
    /// Fails when the admin base address is not a URL.
    pub fn new(tab: &Tab) -> HotelResult<Self> {
        let site = tab.admin()?;
        Ok(Self {
            pattern: route_pattern(&site, ""),
            form: LoginForm::new(tab.page()),
            site,
            tab: tab.clone(),
        })
    }

    /// Open the login screen
    pub async fn navigate(&self) -> HotelResult<ReadyPage> {
        self.site.goto("").await
    }

    /// Type the username
    pub async fn fill_username(&self, username: &str) -> HotelResult<()> {
        self.form.fill_username(username).await
    }

    /// Type the password
    pub async fn fill_password(&self, password: &str) -> HotelResult<()> {
        self.form.fill_password(password).await
    }

    /// Press Login
    pub async fn click_login(&self) -> HotelResult<()> {
        self.form.submit().await
    }

    /// Log in, falling back to the configured credentials for missing values.
    ///
    /// Empty configured credentials are typed as-is and left for the site to
    /// reject.
    pub async fn login(&self, username: Option<&str>, password: Option<&str>) -> HotelResult<()> {
        let config = self.tab.config();
        let username = username.unwrap_or(config.admin_username.as_str());
        let password = password.unwrap_or(config.admin_password.as_str());
        if username.is_empty() {
            tracing::warn!("admin username is empty");
        }
        tracing::info!(username, "admin login");
        self.form.login(username, password).await
    }

    /// Log in and wait until the rooms listing is the current page
    ///
    /// # Errors
    ///
    /// Times out when the site never leaves the login screen.
    pub async fn login_and_wait(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> HotelResult<String> {
        self.login(username, password).await?;
        let landing = UrlMatcher::new(&AdminRoomsPage::pattern_for(&self.site)).to_regex()?;
        self.tab.wait_for_url(&landing).await
    }

    /// Whether the username field is showing
    pub async fn is_login_form_visible(&self) -> HotelResult<bool> {
        self.form.is_visible().await
    }
}

impl PageObject for AdminLoginPage {
    fn url_pattern(&self) -> &str {
        &self.pattern
    }

    fn page_name(&self) -> &'static str {
        "admin login"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::locator::ElementAction;
    use crate::mock::{ClickEffect, FakeElement, FakePage};
    use crate::result::HotelError;
    use std::sync::Arc;

    const USERNAME: &str = "label=\"Username\"";
    const PASSWORD: &str = "label=\"Password\"";
    const LOGIN: &str = "role=button[name=\"Login\"]";

    fn login_page(config: SuiteConfig) -> (Arc<FakePage>, AdminLoginPage) {
        let page = Arc::new(FakePage::new());
        page.add(USERNAME, FakeElement::visible(""));
        page.add(PASSWORD, FakeElement::visible(""));
        page.add(LOGIN, FakeElement::visible("Login"));
        let tab = Tab::new(page.clone(), Arc::new(config));
        (page, AdminLoginPage::new(&tab).unwrap())
    }

    #[tokio::test]
    async fn test_navigate_opens_admin_base() {
        let (page, login) = login_page(SuiteConfig::default());
        login.navigate().await.unwrap();
        assert_eq!(page.visited(), vec!["http://localhost:3000/admin".to_string()]);
        assert!(login.is_current("http://localhost:3000/admin"));
        assert!(login.is_login_form_visible().await.unwrap());
    }

    #[tokio::test]
    async fn test_login_uses_configured_credentials() {
        let (page, login) =
            login_page(SuiteConfig::default().with_credentials("admin", "password"));
        login.login(None, None).await.unwrap();
        assert_eq!(page.value_of(USERNAME).as_deref(), Some("admin"));
        assert_eq!(page.value_of(PASSWORD).as_deref(), Some("password"));
        assert!(page.was_performed(LOGIN, &ElementAction::Click));
    }

    #[tokio::test]
    async fn test_explicit_credentials_win() {
        let (page, login) =
            login_page(SuiteConfig::default().with_credentials("admin", "password"));
        login.login(Some("other"), None).await.unwrap();
        assert_eq!(page.value_of(USERNAME).as_deref(), Some("other"));
        assert_eq!(page.value_of(PASSWORD).as_deref(), Some("password"));
    }

    #[tokio::test]
    async fn test_login_and_wait_reaches_rooms() {
        let (page, login) =
            login_page(SuiteConfig::default().with_credentials("admin", "password"));
        page.on_click(
            LOGIN,
            ClickEffect::Navigate("http://localhost:3000/admin/rooms".to_string()),
        );
        let url = login.login_and_wait(None, None).await.unwrap();
        assert_eq!(url, "http://localhost:3000/admin/rooms");
    }

    #[tokio::test]
    async fn test_login_and_wait_times_out_on_rejection() {
        let mut config = SuiteConfig::default();
        config.navigation_timeout_ms = 40;
        let (page, login) = login_page(config);
        page.set_url("http://localhost:3000/admin");
        let err = login.login_and_wait(None, None).await.unwrap_err();
        assert!(matches!(err, HotelError::Timeout { .. }));
    }
}
