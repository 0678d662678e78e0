//! Fixtures: preconditions run against a tab before a scenario body.
//!
//! [`with_fixture`] sets a fixture up, hands its output to the body and tears
//! it down afterwards whatever the body returned. [`AdminAuth`] is the
//! authenticated-session fixture: the body only ever sees a tab that has
//! already reached the admin room listing.

use async_trait::async_trait;
use std::future::Future;

use crate::pages::{AdminEditRoomPage, AdminLoginPage, AdminRoomsPage};
use crate::result::{HotelError, HotelResult};
use crate::tab::Tab;

/// A precondition prepared on a tab.
#[async_trait]
pub trait Fixture: Send + Sync {
    /// Value handed to the scenario body
    type Output: Send;

    /// Prepare the precondition
    ///
    /// # Errors
    ///
    /// Returns an error if the precondition cannot be reached.
    async fn setup(&mut self, tab: &Tab) -> HotelResult<Self::Output>;

    /// Release whatever setup acquired
    ///
    /// # Errors
    ///
    /// Returns an error if cleanup fails.
    async fn teardown(&mut self) -> HotelResult<()> {
        Ok(())
    }

    /// Fixture name for logging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Lifecycle of one fixture run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    /// Not set up yet
    Registered,
    /// Set up successfully
    SetUp,
    /// Torn down
    TornDown,
    /// Setup or teardown failed
    Failed,
}

/// Run `body` with the output of `fixture`, tearing the fixture down after.
///
/// A setup failure is reported as [`HotelError::Fixture`] and the body never
/// runs. When both the body and teardown fail, the body's error wins.
///
/// # Errors
///
/// Returns the setup, body or teardown failure.
pub async fn with_fixture<F, T, Fut>(
    fixture: &mut F,
    tab: &Tab,
    body: impl FnOnce(F::Output) -> Fut + Send,
) -> HotelResult<T>
where
    F: Fixture,
    Fut: Future<Output = HotelResult<T>> + Send,
{
    let name = fixture.name().to_string();
    tracing::debug!(fixture = %name, "fixture setup");
    let output = fixture.setup(tab).await.map_err(|e| HotelError::Fixture {
        message: format!("fixture '{name}' setup failed: {e}"),
    })?;
    let result = body(output).await;
    let teardown = fixture.teardown().await;
    tracing::debug!(fixture = %name, ok = teardown.is_ok(), "fixture teardown");
    match (result, teardown) {
        (Err(e), _) => Err(e),
        (Ok(_), Err(e)) => Err(HotelError::Fixture {
            message: format!("fixture '{name}' teardown failed: {e}"),
        }),
        (Ok(value), Ok(())) => Ok(value),
    }
}

/// A tab logged into the admin site and sitting on the room listing
#[derive(Debug, Clone)]
pub struct AdminSession {
    tab: Tab,
    landing_url: String,
}

impl AdminSession {
    /// The authenticated tab
    #[must_use]
    pub const fn tab(&self) -> &Tab {
        &self.tab
    }

    /// URL reached after login
    #[must_use]
    pub fn landing_url(&self) -> &str {
        &self.landing_url
    }

    /// Room listing page on this session
    ///
    /// # Errors
    ///
    /// Fails when the admin base address is not a URL.
    pub fn rooms(&self) -> HotelResult<AdminRoomsPage> {
        AdminRoomsPage::new(&self.tab)
    }

    /// Edit page on this session
    ///
    /// # Errors
    ///
    /// Fails when the admin base address is not a URL.
    pub fn edit_room(&self) -> HotelResult<AdminEditRoomPage> {
        AdminEditRoomPage::new(&self.tab)
    }
}

/// Logs in with the configured admin credentials
#[derive(Debug, Clone)]
pub struct AdminAuth {
    state: FixtureState,
}

impl Default for AdminAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminAuth {
    /// Fresh fixture
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FixtureState::Registered,
        }
    }

    /// Where the fixture is in its lifecycle
    #[must_use]
    pub const fn state(&self) -> FixtureState {
        self.state
    }
}

#[async_trait]
impl Fixture for AdminAuth {
    type Output = AdminSession;

    async fn setup(&mut self, tab: &Tab) -> HotelResult<AdminSession> {
        let login = AdminLoginPage::new(tab)?;
        let outcome = async {
            login.navigate().await?;
            login.login_and_wait(None, None).await
        }
        .await;
        match outcome {
            Ok(landing_url) => {
                self.state = FixtureState::SetUp;
                tracing::info!(url = %landing_url, "admin session ready");
                Ok(AdminSession {
                    tab: tab.clone(),
                    landing_url,
                })
            }
            Err(e) => {
                self.state = FixtureState::Failed;
                Err(e)
            }
        }
    }

    async fn teardown(&mut self) -> HotelResult<()> {
        if self.state == FixtureState::SetUp {
            self.state = FixtureState::TornDown;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "admin-auth"
    }
}
