use async_trait::async_trait;
use std::collections::BTreeSet;
use std::time::Duration;

use super::seed_room;
use crate::assertion::{expect_eq, expect_some, expect_true};
use crate::config::EditAddressing;
use crate::fixture::{with_fixture, AdminAuth};
use crate::network::{HttpMethod, RequestFilter, UrlPattern};
use crate::pages::{AdminLoginPage, AdminRoomsPage, PageObject};
use crate::result::{HotelError, HotelResult};
use crate::room::{unique_room_name, NewRoom, RoomType};
use crate::scenario::{step, Scenario, ScenarioContext};
use crate::selectors::Feature;
use crate::wait::{wait_for_value, DEFAULT_POLL_INTERVAL_MS};

/// Log in with the configured credentials and land on the room list
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminLogin;

#[async_trait]
impl Scenario for AdminLogin {
    fn name(&self) -> &'static str {
        "admin-login"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin", "ui", "smoke"]
    }

    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
        let tab = ctx.tab()?;
        let login = AdminLoginPage::new(tab)?;
        let rooms = AdminRoomsPage::new(tab)?;
        step("open login page", login.navigate()).await?;
        let landing = step("log in", login.login_and_wait(None, None)).await?;
        step("check logged-in state", async {
            expect_true("landed on the admin room list", rooms.is_current(&landing))?;
            let form_showing = login.is_login_form_visible().await?;
            expect_eq("login form visible after login", false, form_showing)
        })
        .await
    }
}

/// Create a room through the admin form, check what the form posted and
/// that the API lists the room
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminCreateRoom;

#[async_trait]
impl Scenario for AdminCreateRoom {
    fn name(&self) -> &'static str {
        "admin-create-room"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin", "ui", "crosscheck"]
    }

    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
        let tab = ctx.tab()?;
        let wanted = NewRoom::new(unique_room_name(), RoomType::Single)
            .with_accessible(true)
            .with_price(888)
            .with_features([Feature::WiFi, Feature::Tv]);
        let filter = RequestFilter::new(UrlPattern::Glob(format!(
            "**/{}",
            ctx.config().rooms_path
        )))
        .with_method(HttpMethod::Post);

        let mut auth = AdminAuth::new();
        with_fixture(&mut auth, tab, |session| async move {
            let rooms = session.rooms()?;
            let observer = step("observe room creation", session.tab().observe(filter)).await?;
            step("create room through the form", rooms.create_room(&wanted)).await?;
            step("wait for the new row", rooms.wait_for_room(&wanted.room_name)).await?;

            let request = step(
                "capture creation request",
                observer.single(ctx.config().action_timeout()),
            )
            .await?;
            step("check posted body", async {
                let posted: NewRoom = request.body_json()?;
                expect_eq("posted room", &wanted, &posted)
            })
            .await?;

            let listed = step("find room through the API", async {
                let found = ctx.api().find_room_by_name(&wanted.room_name).await?;
                expect_some("room listed by the API", found)
            })
            .await?;
            step("check listed room", async {
                expect_eq("room type", RoomType::Single, listed.room_type)?;
                expect_eq("room price", 888, listed.room_price)?;
                expect_true("server assigned an id", listed.room_id.is_some())
            })
            .await?;

            step("check row in admin listing", async {
                let row = rooms.find_row(&wanted.room_name).await?;
                expect_true("row listed in the admin UI", row.is_some())
            })
            .await
        })
        .await
    }
}

/// Change price and features of a room through the edit page and read the
/// change back through the API
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminEditRoom;

#[async_trait]
impl Scenario for AdminEditRoom {
    fn name(&self) -> &'static str {
        "admin-edit-room"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["admin", "ui", "crosscheck"]
    }

    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
        let tab = ctx.tab()?;
        let seeded = seed_room(ctx.api(), RoomType::Double, 100).await?;
        let id = expect_some("seeded room id", seeded.room_id)?;
        let features: BTreeSet<Feature> = [Feature::WiFi, Feature::Safe].into_iter().collect();

        let mut auth = AdminAuth::new();
        with_fixture(&mut auth, tab, |session| async move {
            let rooms = session.rooms()?;
            let edit = session.edit_room()?;
            step("reload room list", rooms.navigate()).await?;
            step("wait for seeded row", rooms.wait_for_room(&seeded.room_name)).await?;
            let row = step("find seeded row", async {
                let row = rooms.find_row(&seeded.room_name).await?;
                expect_some("seeded row", row)
            })
            .await?;
            let original = step("read row price", row.price()).await?;
            let new_price = u32::try_from(original + 50)
                .map_err(|_| HotelError::assertion("row price", "a whole number", original))?;

            match ctx.config().edit_addressing {
                EditAddressing::Index => {
                    step("open room by row", rooms.click_room_row(row.index())).await?;
                }
                EditAddressing::Id => {
                    step("open room by id", edit.navigate(id)).await?;
                }
            }
            step("edit price and features", edit.edit_room(new_price, &features)).await?;

            step("verify through the API", async {
                let room = wait_for_value(
                    "observe update of",
                    &format!("room {id}"),
                    ctx.config().navigation_timeout(),
                    Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
                    || async {
                        let room = ctx.api().get_room_by_id(id).await?;
                        Ok::<_, HotelError>((room.room_price == new_price).then_some(room))
                    },
                )
                .await?;
                expect_eq("room features", &features, &room.features)
            })
            .await
        })
        .await
    }
}
