use super::Region;
use crate::locator::Locator;
use crate::result::HotelResult;
use crate::selectors::ClientSelector;

/// Check-in/check-out widget in the home page booking section
#[derive(Debug, Clone)]
pub struct BookingDates {
    region: Region,
}

impl BookingDates {
    /// Widget inside the booking section `root`
    #[must_use]
    pub const fn new(root: Locator) -> Self {
        Self {
            region: Region::new(root),
        }
    }

    fn inputs(&self) -> Locator {
        self.region.part(ClientSelector::DateInput.selector())
    }

    /// Type both dates, check-in into the first input and check-out into the last
    ///
    /// # Errors
    ///
    /// Times out when an input is not reachable.
    pub async fn select_dates(&self, checkin: &str, checkout: &str) -> HotelResult<()> {
        tracing::debug!(checkin, checkout, "selecting dates");
        self.inputs().first().fill(checkin).await?;
        self.inputs().last().fill(checkout).await
    }

    /// Press the availability button
    ///
    /// # Errors
    ///
    /// Times out when the button is not reachable.
    pub async fn check_availability(&self) -> HotelResult<()> {
        self.region
            .click(ClientSelector::CheckAvailability.selector())
            .await
    }
}
