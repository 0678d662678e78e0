use super::Region;
use crate::locator::Locator;
use crate::result::HotelResult;
use crate::selectors::ClientSelector;

/// One room card on the client home page
#[derive(Debug, Clone)]
pub struct RoomCard {
    region: Region,
}

/// One component per card inside `section`
///
/// # Errors
///
/// Propagates driver failures only.
pub async fn room_cards(section: &Locator) -> HotelResult<Vec<RoomCard>> {
    let cards = section.locator(ClientSelector::RoomCard.selector());
    let count = cards.count().await?;
    tracing::debug!(count, "room cards");
    Ok((0..count).map(|i| RoomCard::new(cards.nth(i))).collect())
}

impl RoomCard {
    /// Card rooted at `card`
    #[must_use]
    pub const fn new(card: Locator) -> Self {
        Self {
            region: Region::new(card),
        }
    }

    /// Card title, empty when absent
    pub async fn name(&self) -> HotelResult<String> {
        self.region.text(ClientSelector::CardTitle.selector()).await
    }

    /// Follow the card's booking link
    ///
    /// # Errors
    ///
    /// Times out when the link is not reachable.
    pub async fn book(&self) -> HotelResult<()> {
        self.region.click(ClientSelector::CardBook.selector()).await
    }
}
