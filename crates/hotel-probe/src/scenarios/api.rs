use async_trait::async_trait;
use std::collections::BTreeSet;

use super::seed_room;
use crate::assertion::{expect_eq, expect_some, expect_true};
use crate::result::HotelResult;
use crate::room::{unique_room_name, NewRoom, RoomPatch, RoomType};
use crate::scenario::{step, Scenario, ScenarioContext};
use crate::selectors::Feature;

/// Create a room through the API and find it again by name
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiRoundTrip;

#[async_trait]
impl Scenario for ApiRoundTrip {
    fn name(&self) -> &'static str {
        "api-round-trip"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["api", "smoke"]
    }

    fn needs_browser(&self) -> bool {
        false
    }

    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
        let wanted = NewRoom::new(unique_room_name(), RoomType::Suite)
            .with_accessible(true)
            .with_price(200)
            .with_features([Feature::WiFi, Feature::Tv, Feature::Safe]);

        let created = step("create room", ctx.api().create_room(&wanted)).await?;
        step("check created room", async {
            expect_true("server assigned an id", created.room_id.is_some())?;
            expect_true("created room matches request", created.matches(&wanted))
        })
        .await?;

        let found = step("find room by name", async {
            let found = ctx.api().find_room_by_name(&wanted.room_name).await?;
            expect_some("room listed by name", found)
        })
        .await?;
        step("check listed room", async {
            expect_eq("listed id", created.room_id, found.room_id)?;
            expect_true("listed room matches request", found.matches(&wanted))
        })
        .await
    }
}

/// Update a room through the API and read the change back by id
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiUpdateConsistency;

#[async_trait]
impl Scenario for ApiUpdateConsistency {
    fn name(&self) -> &'static str {
        "api-update-consistency"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["api"]
    }

    fn needs_browser(&self) -> bool {
        false
    }

    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
        let seeded = seed_room(ctx.api(), RoomType::Double, 150).await?;
        let id = expect_some("seeded room id", seeded.room_id)?;
        let features: BTreeSet<Feature> = [Feature::Radio, Feature::Refreshments]
            .into_iter()
            .collect();
        let patch = RoomPatch::new()
            .price(seeded.room_price + 75)
            .features(features.iter().copied());

        let mut expected = seeded.clone();
        patch.apply_to(&mut expected);

        let updated = step("update room", ctx.api().update_room(id, &patch)).await?;
        step("check update reply", async {
            expect_eq("updated price", expected.room_price, updated.room_price)?;
            expect_eq("updated features", &expected.features, &updated.features)
        })
        .await?;

        let fetched = step("fetch room by id", ctx.api().get_room_by_id(id)).await?;
        step("check fetched room", async {
            expect_eq("fetched name", &expected.room_name, &fetched.room_name)?;
            expect_eq("fetched type", expected.room_type, fetched.room_type)?;
            expect_eq("fetched price", expected.room_price, fetched.room_price)?;
            expect_eq("fetched features", &expected.features, &fetched.features)
        })
        .await
    }
}

/// Looking up a name nobody created finds nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownNameLookup;

#[async_trait]
impl Scenario for UnknownNameLookup {
    fn name(&self) -> &'static str {
        "api-unknown-name"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["api"]
    }

    fn needs_browser(&self) -> bool {
        false
    }

    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
        seed_room(ctx.api(), RoomType::Single, 90).await?;
        let missing = unique_room_name();
        step("look up unknown name", async {
            let found = ctx.api().find_room_by_name(&missing).await?;
            expect_eq("room found for unknown name", None, found.map(|r| r.room_name))
        })
        .await
    }
}
