use serde::Serialize;

use super::Region;
use crate::locator::Locator;
use crate::result::HotelResult;
use crate::selectors::AdminSelector;

/// One row of the admin room listing
#[derive(Debug, Clone)]
pub struct RoomRow {
    region: Region,
    index: usize,
}

/// Everything a row shows, read in one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSnapshot {
    /// Position in the listing
    pub index: usize,
    /// Room name cell
    pub name: String,
    /// Type cell
    pub room_type: String,
    /// Accessible cell read as a flag
    pub accessible: bool,
    /// Price cell
    pub price: i64,
    /// Feature details cell
    pub details: String,
}

/// One component per listing row currently rendered
///
/// # Errors
///
/// Propagates driver failures only.
pub async fn room_rows(listing: &Locator) -> HotelResult<Vec<RoomRow>> {
    let count = listing.count().await?;
    tracing::debug!(count, "room rows");
    Ok((0..count)
        .map(|index| RoomRow::new(listing.nth(index), index))
        .collect())
}

impl RoomRow {
    /// Row rooted at `row`
    #[must_use]
    pub const fn new(row: Locator, index: usize) -> Self {
        Self {
            region: Region::new(row),
            index,
        }
    }

    /// Position in the listing
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Root locator of the row
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        self.region.root()
    }

    /// Room name
    pub async fn name(&self) -> HotelResult<String> {
        self.region.text(AdminSelector::RowName.selector()).await
    }

    /// Room type as displayed
    pub async fn room_type(&self) -> HotelResult<String> {
        self.region.text(AdminSelector::RowType.selector()).await
    }

    /// Accessible flag
    pub async fn accessible(&self) -> HotelResult<bool> {
        self.region.flag(AdminSelector::RowAccessible.selector()).await
    }

    /// Price, 0 when unreadable
    pub async fn price(&self) -> HotelResult<i64> {
        self.region.number(AdminSelector::RowPrice.selector()).await
    }

    /// Feature details
    pub async fn details(&self) -> HotelResult<String> {
        self.region.text(AdminSelector::RowDetails.selector()).await
    }

    /// Backend id, taken from the trailing digits of the name cell's id
    /// (`roomName12` gives 12)
    pub async fn room_id(&self) -> HotelResult<Option<u64>> {
        let id = self
            .region
            .part(AdminSelector::RowName.selector())
            .attribute("id")
            .await?;
        Ok(id.and_then(|id| {
            let digits = id.trim_start_matches(|c: char| !c.is_ascii_digit());
            digits.parse().ok()
        }))
    }

    /// Read every cell
    pub async fn snapshot(&self) -> HotelResult<RowSnapshot> {
        Ok(RowSnapshot {
            index: self.index,
            name: self.name().await?,
            room_type: self.room_type().await?,
            accessible: self.accessible().await?,
            price: self.price().await?,
            details: self.details().await?,
        })
    }

    /// Open the room by clicking its row
    ///
    /// # Errors
    ///
    /// Times out when the row is not clickable.
    pub async fn open(&self) -> HotelResult<()> {
        self.region.root().click().await
    }

    /// Press the row's edit control
    ///
    /// # Errors
    ///
    /// Times out when the control is not reachable.
    pub async fn edit(&self) -> HotelResult<()> {
        self.region.click(AdminSelector::RowEdit.selector()).await
    }

    /// Press the row's delete control
    ///
    /// # Errors
    ///
    /// Times out when the control is not reachable.
    pub async fn delete(&self) -> HotelResult<()> {
        tracing::info!(index = self.index, "deleting room row");
        self.region.click(AdminSelector::RowDelete.selector()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::locator::Selector;
    use crate::mock::{FakeElement, FakePage};
    use std::sync::Arc;

    const LISTING: &str = "[data-testid=\"roomlisting\"]";

    fn cell(index: usize, css: &str) -> String {
        format!("{LISTING} >> nth={index} >> {css}")
    }

    fn page_with_rows() -> Arc<FakePage> {
        let page = Arc::new(FakePage::new());
        page.set_count(LISTING, 2);
        page.add(format!("{LISTING} >> nth=0"), FakeElement::visible("101"));
        page.add(
            cell(0, "[id^=\"roomName\"]"),
            FakeElement::visible("101").with_attribute("id", "roomName1"),
        );
        page.add(cell(0, "[id^=\"type\"]"), FakeElement::visible("Single"));
        page.add(cell(0, "[id^=\"accessible\"]"), FakeElement::visible("true"));
        page.add(cell(0, "[id^=\"roomPrice\"]"), FakeElement::visible("100"));
        page.add(cell(0, "[id^=\"details\"]"), FakeElement::visible("WiFi, TV"));
        page.add(cell(1, "[id^=\"roomName\"]"), FakeElement::visible("102"));
        page.add(cell(1, "[id^=\"roomPrice\"]"), FakeElement::visible("n/a"));
        page.add(cell(1, ".roomDelete"), FakeElement::visible("x"));
        page
    }

    #[tokio::test]
    async fn test_rows_are_independent_instances() {
        let page = page_with_rows();
        let listing = Locator::new(page, Selector::test_id("roomlisting"));
        let rows = room_rows(&listing).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name().await.unwrap(), "101");
        assert_eq!(rows[1].name().await.unwrap(), "102");
    }

    #[tokio::test]
    async fn test_snapshot_reads_all_cells() {
        let page = page_with_rows();
        let listing = Locator::new(page, Selector::test_id("roomlisting"));
        let first = room_rows(&listing).await.unwrap().remove(0);
        assert_eq!(
            first.snapshot().await.unwrap(),
            RowSnapshot {
                index: 0,
                name: "101".to_string(),
                room_type: "Single".to_string(),
                accessible: true,
                price: 100,
                details: "WiFi, TV".to_string(),
            }
        );
        assert_eq!(first.room_id().await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_unreadable_cells_default() {
        let page = page_with_rows();
        let listing = Locator::new(page, Selector::test_id("roomlisting"));
        let second = room_rows(&listing).await.unwrap().remove(1);
        assert_eq!(second.price().await.unwrap(), 0);
        assert!(!second.accessible().await.unwrap());
        assert_eq!(second.room_type().await.unwrap(), "");
        assert_eq!(second.room_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_clicks_inside_row() {
        let page = page_with_rows();
        let listing = Locator::new(page.clone(), Selector::test_id("roomlisting"));
        let second = room_rows(&listing).await.unwrap().remove(1);
        second.delete().await.unwrap();
        assert!(page.was_performed(
            &cell(1, ".roomDelete"),
            &crate::locator::ElementAction::Click
        ));
    }
}
