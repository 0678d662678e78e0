use async_trait::async_trait;

use super::seed_room;
use crate::assertion::{expect, expect_contains, expect_eq, expect_some, expect_true};
use crate::components::Guest;
use crate::dates::Stay;
use crate::pages::{HomePage, PageObject, ReservationPage, UrlMatcher};
use crate::result::HotelResult;
use crate::room::RoomType;
use crate::scenario::{step, Scenario, ScenarioContext};
use crate::selectors::ClientSelector;

/// Message the backend shows for a first name outside 3..=18 characters
pub const FIRST_NAME_SIZE_ERROR: &str = "size must be between 3 and 18";

/// Reservation with a one-letter first name is refused and the form stays
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstNameValidation;

#[async_trait]
impl Scenario for FirstNameValidation {
    fn name(&self) -> &'static str {
        "booking-first-name-validation"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["client", "ui", "validation"]
    }

    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
        let tab = ctx.tab()?;
        let room = step("pick a listed room", async {
            let rooms = ctx.api().get_rooms().await?;
            expect_some("a listed room", rooms.into_iter().next())
        })
        .await?;
        let id = expect_some("listed room id", room.room_id)?;
        let (checkin, checkout) = Stay::random_future().iso_format();

        let reservation = ReservationPage::new(tab)?;
        step(
            "open reservation page",
            reservation.navigate(id, &checkin, &checkout),
        )
        .await?;
        step(
            "submit with a short first name",
            reservation.submit_reservation(&Guest::default().with_first_name("J")),
        )
        .await?;
        step("wait for the error", reservation.wait_for_error()).await?;
        step("check error and form", async {
            let messages = reservation.error_messages().await?;
            expect_contains("error alert", &messages.join("\n"), FIRST_NAME_SIZE_ERROR)?;
            expect_true(
                "first name field still shown",
                tab.locator(ClientSelector::FirstName.selector())
                    .is_visible()
                    .await?,
            )
        })
        .await
    }
}

/// A second booking for nights already taken is refused
#[derive(Debug, Clone, Copy, Default)]
pub struct BookedDatesConflict;

#[async_trait]
impl Scenario for BookedDatesConflict {
    fn name(&self) -> &'static str {
        "booking-dates-conflict"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["client", "ui", "validation"]
    }

    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
        let tab = ctx.tab()?;
        let room = seed_room(ctx.api(), RoomType::Single, 120).await?;
        let id = expect_some("seeded room id", room.room_id)?;
        let (checkin, checkout) = Stay::random_future().iso_format();
        let guest = Guest::default();
        let reservation = ReservationPage::new(tab)?;

        step("open reservation page", reservation.navigate(id, &checkin, &checkout)).await?;
        step("book the stay", reservation.submit_reservation(&guest)).await?;
        step("wait for confirmation", reservation.wait_for_confirmation()).await?;

        step("reopen reservation page", reservation.navigate(id, &checkin, &checkout)).await?;
        step("book the same stay again", reservation.submit_reservation(&guest)).await?;
        step("wait for the refusal", reservation.wait_for_error()).await?;
        step("check second booking refused", async {
            let confirmed = reservation.is_confirmed().await?;
            expect_eq("second booking confirmed", false, confirmed)
        })
        .await
    }
}

/// Pick dates on the home page, choose a room and book it
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientBooking;

#[async_trait]
impl Scenario for ClientBooking {
    fn name(&self) -> &'static str {
        "booking-happy-path"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["client", "ui", "smoke"]
    }

    async fn run(&self, ctx: &ScenarioContext) -> HotelResult<()> {
        let tab = ctx.tab()?;
        let home = HomePage::new(tab)?;
        let reservation = ReservationPage::new(tab)?;
        let (checkin, checkout) = Stay::tomorrow(chrono::Local::now().date_naive()).us_format();

        step("open home page", home.navigate()).await?;
        step("select dates", home.select_dates(&checkin, &checkout)).await?;
        step("check availability", home.check_availability()).await?;
        step("choose a single room", home.select_room(RoomType::Single.as_str())).await?;
        step("wait for reservation page", async {
            let pattern = UrlMatcher::new(reservation.url_pattern()).to_regex()?;
            tab.wait_for_url(&pattern).await
        })
        .await?;
        step("submit reservation", reservation.submit_reservation(&Guest::default())).await?;
        step(
            "check confirmation",
            expect(tab.locator(ClientSelector::BookingConfirmed.selector())).to_be_visible(),
        )
        .await
    }
}
