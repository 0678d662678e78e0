use super::Region;
use crate::locator::Locator;
use crate::result::HotelResult;
use crate::selectors::AdminSelector;

/// Admin login form
#[derive(Debug, Clone)]
pub struct LoginForm {
    region: Region,
}

impl LoginForm {
    /// Form living at `root`, usually the page itself
    #[must_use]
    pub const fn new(root: Locator) -> Self {
        Self {
            region: Region::new(root),
        }
    }

    /// Type the username
    ///
    /// # Errors
    ///
    /// Times out when the field is not reachable.
    pub async fn fill_username(&self, username: &str) -> HotelResult<()> {
        self.region
            .fill(AdminSelector::Username.selector(), username)
            .await
    }

    /// Type the password
    ///
    /// # Errors
    ///
    /// Times out when the field is not reachable.
    pub async fn fill_password(&self, password: &str) -> HotelResult<()> {
        self.region
            .fill(AdminSelector::Password.selector(), password)
            .await
    }

    /// Press the login button
    ///
    /// # Errors
    ///
    /// Times out when the button is not reachable.
    pub async fn submit(&self) -> HotelResult<()> {
        self.region.click(AdminSelector::LoginButton.selector()).await
    }

    /// Fill both fields and submit
    ///
    /// # Errors
    ///
    /// Fails at the first unreachable control.
    pub async fn login(&self, username: &str, password: &str) -> HotelResult<()> {
        tracing::debug!(username, "submitting login form");
        self.fill_username(username).await?;
        self.fill_password(password).await?;
        self.submit().await
    }

    /// Whether the username field is showing
    ///
    /// # Errors
    ///
    /// Propagates driver failures only.
    pub async fn is_visible(&self) -> HotelResult<bool> {
        self.region
            .part(AdminSelector::Username.selector())
            .is_visible()
            .await
    }
}
