use super::{route_pattern, PageObject};
use crate::components::{parse_amount, BookingCard, Guest, Region};
use crate::locator::ElementState;
use crate::navigation::{ClientSite, Navigator, ReadyPage};
use crate::result::HotelResult;
use crate::selectors::ClientSelector;
use crate::tab::Tab;

/// Client reservation page for one room and one stay
#[derive(Debug, Clone)]
pub struct ReservationPage {
    site: ClientSite,
    page: Region,
    card: BookingCard,
    pattern: String,
}

impl ReservationPage {
    /// Reservation page for the tab's client site
    ///
    /// # Errors
    ///
    /// Fails when the client base address is not a URL.
    pub fn new(tab: &Tab) -> HotelResult<Self> {
        let site = tab.client()?;
        Ok(Self {
            pattern: route_pattern(&site, "reservation/:id"),
            page: Region::new(tab.page()),
            card: BookingCard::new(tab.page()),
            site,
        })
    }

    /// Open the page for `room_id` with `YYYY-MM-DD` dates
    pub async fn navigate(
        &self,
        room_id: u64,
        checkin: &str,
        checkout: &str,
    ) -> HotelResult<ReadyPage> {
        let mut url = self.site.resolve(&format!("/reservation/{room_id}"))?;
        url.query_pairs_mut()
            .append_pair("checkin", checkin)
            .append_pair("checkout", checkout);
        self.site.open(url).await
    }

    /// Room heading
    pub async fn room_title(&self) -> HotelResult<String> {
        self.page.text(ClientSelector::RoomTitle.selector()).await
    }

    /// Nightly price digits, 0 when unreadable
    pub async fn room_price(&self) -> HotelResult<i64> {
        let text = self
            .page
            .part(ClientSelector::RoomPrice.selector())
            .text_or_empty()
            .await?;
        Ok(parse_amount(&text))
    }

    /// First description paragraph
    pub async fn room_description(&self) -> HotelResult<String> {
        let text = self
            .page
            .part(ClientSelector::RoomDescription.selector())
            .first()
            .text_or_empty()
            .await?;
        Ok(text.trim().to_string())
    }

    /// Amenity labels in display order
    pub async fn room_features(&self) -> HotelResult<Vec<String>> {
        let labels = self
            .page
            .part(ClientSelector::Amenity.selector())
            .all_texts()
            .await?;
        Ok(labels.iter().map(|l| l.trim().to_string()).collect())
    }

    /// Total shown in the booking card
    pub async fn total_price(&self) -> HotelResult<String> {
        self.card.total_price().await
    }

    /// The booking card
    #[must_use]
    pub const fn booking_card(&self) -> &BookingCard {
        &self.card
    }

    /// Whether the availability calendar shows
    pub async fn is_calendar_visible(&self) -> HotelResult<bool> {
        self.card.is_calendar_visible().await
    }

    /// Whether the guest form shows
    pub async fn is_form_visible(&self) -> HotelResult<bool> {
        self.card.is_form_visible().await
    }

    /// Open the guest form
    pub async fn open_booking_form(&self) -> HotelResult<()> {
        self.card.open_form().await
    }

    /// Enter guest details into an open form
    pub async fn fill_booking_form(&self, guest: &Guest) -> HotelResult<()> {
        self.card.fill_form(guest).await
    }

    /// Open the form, enter `guest` and press Reserve Now
    ///
    /// # Errors
    ///
    /// Fails at the first control that never becomes actionable. Whether the
    /// site accepted the booking is read separately.
    pub async fn submit_reservation(&self, guest: &Guest) -> HotelResult<()> {
        tracing::info!(first_name = %guest.first_name, "submitting reservation");
        self.open_booking_form().await?;
        self.fill_booking_form(guest).await?;
        self.card.submit().await
    }

    /// Dismiss the guest form
    pub async fn cancel_booking(&self) -> HotelResult<()> {
        self.card.cancel().await
    }

    /// Whether the confirmation message shows
    pub async fn is_confirmed(&self) -> HotelResult<bool> {
        self.page
            .part(ClientSelector::BookingConfirmed.selector())
            .is_visible()
            .await
    }

    /// Text of every error box
    pub async fn error_messages(&self) -> HotelResult<Vec<String>> {
        let messages = self
            .page
            .part(ClientSelector::ErrorAlert.selector())
            .all_texts()
            .await?;
        Ok(messages.iter().map(|m| m.trim().to_string()).collect())
    }

    /// Wait for the confirmation message
    ///
    /// # Errors
    ///
    /// Times out when the booking is never confirmed.
    pub async fn wait_for_confirmation(&self) -> HotelResult<()> {
        self.page
            .part(ClientSelector::BookingConfirmed.selector())
            .wait_for(ElementState::Visible)
            .await
    }

    /// Wait for an error box
    ///
    /// # Errors
    ///
    /// Times out when no error is shown.
    pub async fn wait_for_error(&self) -> HotelResult<()> {
        self.page
            .part(ClientSelector::ErrorAlert.selector())
            .wait_for(ElementState::Visible)
            .await
    }
}

impl PageObject for ReservationPage {
    fn url_pattern(&self) -> &str {
        &self.pattern
    }

    fn page_name(&self) -> &'static str {
        "reservation"
    }
}
