use super::{route_pattern, PageObject};
use crate::components::{room_cards, BookingDates, RoomCard};
use crate::locator::{ElementState, Locator};
use crate::navigation::{ClientSite, Navigator, ReadyPage};
use crate::result::{HotelError, HotelResult};
use crate::selectors::ClientSelector;
use crate::tab::Tab;

/// Client landing page with the booking widget and room cards
#[derive(Debug, Clone)]
pub struct HomePage {
    site: ClientSite,
    booking: Locator,
    rooms: Locator,
    dates: BookingDates,
    pattern: String,
}

impl HomePage {
    /// Home page for the tab's client site
    ///
    /// # Errors
    ///
    /// Fails when the client base address is not a URL.
    pub fn new(tab: &Tab) -> HotelResult<Self> {
        let site = tab.client()?;
        let booking = tab.locator(ClientSelector::Booking.selector());
        Ok(Self {
            pattern: route_pattern(&site, "/"),
            dates: BookingDates::new(booking.clone()),
            rooms: tab.locator(ClientSelector::Rooms.selector()),
            booking,
            site,
        })
    }

    /// Open the page and bring the booking section into view
    pub async fn navigate(&self) -> HotelResult<ReadyPage> {
        let ready = self.site.goto("/").await?;
        self.booking.scroll_into_view().await?;
        Ok(ready)
    }

    /// Type check-in and check-out dates (`M/D/YYYY`)
    pub async fn select_dates(&self, checkin: &str, checkout: &str) -> HotelResult<()> {
        self.dates.select_dates(checkin, checkout).await
    }

    /// Ask for availability and wait for the first room card
    ///
    /// # Errors
    ///
    /// Times out when no room card is rendered.
    pub async fn check_availability(&self) -> HotelResult<()> {
        self.dates.check_availability().await?;
        self.rooms.scroll_into_view().await?;
        self.rooms
            .locator(ClientSelector::RoomCard.selector())
            .first()
            .wait_for(ElementState::Visible)
            .await
    }

    /// Room cards currently rendered
    pub async fn rooms(&self) -> HotelResult<Vec<RoomCard>> {
        room_cards(&self.rooms).await
    }

    /// Follow the booking link of the card titled `name`
    ///
    /// # Errors
    ///
    /// Fails an assertion when no card carries that title.
    pub async fn select_room(&self, name: &str) -> HotelResult<()> {
        let cards = self.rooms().await?;
        let mut titles = Vec::with_capacity(cards.len());
        for card in cards {
            let title = card.name().await?;
            if title == name {
                tracing::info!(room = name, "selecting room");
                return card.book().await;
            }
            titles.push(title);
        }
        Err(HotelError::assertion("room card with title", name, titles))
    }
}

impl PageObject for HomePage {
    fn url_pattern(&self) -> &str {
        &self.pattern
    }

    fn page_name(&self) -> &'static str {
        "home"
    }
}
