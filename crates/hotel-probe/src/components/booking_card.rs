use serde::{Deserialize, Serialize};

use super::{parse_amount, Region};
use crate::locator::{ElementState, Locator};
use crate::result::HotelResult;
use crate::selectors::ClientSelector;

/// Guest details entered on the reservation form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
}

impl Guest {
    /// Build a guest
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Replace the first name
    #[must_use]
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self
    }
}

impl Default for Guest {
    fn default() -> Self {
        Self::new("John", "Doe", "john.doe@example.com", "123456789012")
    }
}

/// Booking card on the reservation page.
///
/// Price summary, calendar and the initial reserve button sit inside the
/// card; the guest form fields are rendered at page level once it opens.
#[derive(Debug, Clone)]
pub struct BookingCard {
    card: Region,
    page: Region,
}

impl BookingCard {
    /// Card under `page`
    #[must_use]
    pub fn new(page: Locator) -> Self {
        Self {
            card: Region::new(page.locator(ClientSelector::BookingCard.selector())),
            page: Region::new(page),
        }
    }

    /// Last price figure in the summary, as displayed
    pub async fn total_price(&self) -> HotelResult<String> {
        let text = self
            .card
            .part(ClientSelector::TotalPrice.selector())
            .last()
            .text_or_empty()
            .await?;
        Ok(text.trim().to_string())
    }

    /// Total price digits, 0 when unreadable
    pub async fn total_amount(&self) -> HotelResult<i64> {
        Ok(parse_amount(&self.total_price().await?))
    }

    /// Open the guest form
    ///
    /// # Errors
    ///
    /// Times out when the button is not reachable.
    pub async fn open_form(&self) -> HotelResult<()> {
        self.card.click(ClientSelector::ReserveButton.selector()).await
    }

    /// Whether the availability calendar shows
    pub async fn is_calendar_visible(&self) -> HotelResult<bool> {
        self.card
            .part(ClientSelector::Calendar.selector())
            .is_visible()
            .await
    }

    /// Whether the guest form shows
    pub async fn is_form_visible(&self) -> HotelResult<bool> {
        self.page
            .part(ClientSelector::FirstName.selector())
            .is_visible()
            .await
    }

    /// Enter guest details once the form is visible
    ///
    /// # Errors
    ///
    /// Times out when the form never appears.
    pub async fn fill_form(&self, guest: &Guest) -> HotelResult<()> {
        self.page
            .part(ClientSelector::FirstName.selector())
            .wait_for(ElementState::Visible)
            .await?;
        self.page
            .fill(ClientSelector::FirstName.selector(), &guest.first_name)
            .await?;
        self.page
            .fill(ClientSelector::LastName.selector(), &guest.last_name)
            .await?;
        self.page
            .fill(ClientSelector::Email.selector(), &guest.email)
            .await?;
        self.page
            .fill(ClientSelector::Phone.selector(), &guest.phone)
            .await
    }

    /// Submit the guest form
    ///
    /// # Errors
    ///
    /// Times out when the button is not reachable.
    pub async fn submit(&self) -> HotelResult<()> {
        self.page.click(ClientSelector::ReserveNow.selector()).await
    }

    /// Dismiss the guest form
    ///
    /// # Errors
    ///
    /// Times out when the button is not reachable.
    pub async fn cancel(&self) -> HotelResult<()> {
        self.page.click(ClientSelector::CancelBooking.selector()).await
    }
}
