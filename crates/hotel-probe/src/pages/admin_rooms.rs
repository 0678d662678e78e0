use super::{route_pattern, PageObject};
use crate::components::{room_rows, FeatureChecklist, Region, RoomRow};
use crate::locator::{ElementState, Locator};
use crate::navigation::{AdminSite, Navigator, ReadyPage};
use crate::result::HotelResult;
use crate::room::NewRoom;
use crate::selectors::{AdminSelector, TRUTH_TOKEN};
use crate::tab::Tab;

/// Admin room listing with the create-room form
#[derive(Debug, Clone)]
pub struct AdminRoomsPage {
    site: AdminSite,
    form: Region,
    features: FeatureChecklist,
    listing: Locator,
    pattern: String,
}

impl AdminRoomsPage {
    /// Rooms page for the tab's admin site
    ///
    /// # Errors
    ///
    /// Fails when the admin base address is not a URL.
    pub fn new(tab: &Tab) -> HotelResult<Self> {
        let site = tab.admin()?;
        Ok(Self {
            pattern: Self::pattern_for(&site),
            form: Region::new(tab.page()),
            features: FeatureChecklist::new(tab.page()),
            listing: tab.locator(AdminSelector::RoomListing.selector()),
            site,
        })
    }

    pub(crate) fn pattern_for(site: &AdminSite) -> String {
        route_pattern(site, "rooms")
    }

    /// Open the listing
    pub async fn navigate(&self) -> HotelResult<ReadyPage> {
        self.site.goto("/rooms").await
    }

    /// Rows currently rendered
    pub async fn room_rows(&self) -> HotelResult<Vec<RoomRow>> {
        room_rows(&self.listing).await
    }

    /// Row at `index`, whether or not it is rendered yet
    #[must_use]
    pub fn row(&self, index: usize) -> RoomRow {
        RoomRow::new(self.listing.nth(index), index)
    }

    /// Open the room at `index` by clicking its row
    ///
    /// # Errors
    ///
    /// Times out when there is no such row.
    pub async fn click_room_row(&self, index: usize) -> HotelResult<()> {
        tracing::debug!(index, "opening room row");
        self.row(index).open().await
    }

    /// First row whose name cell reads `name`
    pub async fn find_row(&self, name: &str) -> HotelResult<Option<RoomRow>> {
        for row in self.room_rows().await? {
            if row.name().await? == name {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// Fill the create form and submit it
    ///
    /// # Errors
    ///
    /// Fails at the first form control that never becomes actionable.
    pub async fn create_room(&self, room: &NewRoom) -> HotelResult<()> {
        tracing::info!(room = %room.room_name, room_type = %room.room_type, "creating room through the form");
        self.form
            .fill(AdminSelector::RoomName.selector(), &room.room_name)
            .await?;
        self.form
            .part(AdminSelector::RoomType.selector())
            .select_option(room.room_type.as_str())
            .await?;
        let accessible = if room.accessible { TRUTH_TOKEN } else { "false" };
        self.form
            .part(AdminSelector::Accessible.selector())
            .select_option(accessible)
            .await?;
        self.form
            .fill(
                AdminSelector::RoomPrice.selector(),
                &room.room_price.to_string(),
            )
            .await?;
        self.features.tick(&room.features).await?;
        self.form.click(AdminSelector::CreateRoom.selector()).await
    }

    /// Wait until a row mentioning `name` shows
    ///
    /// # Errors
    ///
    /// Times out when the row never appears.
    pub async fn wait_for_room(&self, name: &str) -> HotelResult<()> {
        self.listing
            .filter_text(name)
            .wait_for(ElementState::Visible)
            .await
    }
}

impl PageObject for AdminRoomsPage {
    fn url_pattern(&self) -> &str {
        &self.pattern
    }

    fn page_name(&self) -> &'static str {
        "admin rooms"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;
    use crate::locator::ElementAction;
    use crate::mock::{ClickEffect, FakeElement, FakePage};
    use crate::result::HotelError;
    use crate::room::RoomType;
    use crate::selectors::Feature;
    use std::sync::Arc;
    use std::time::Duration;

    const LISTING: &str = "[data-testid=\"roomlisting\"]";

    fn rooms_page(page: &Arc<FakePage>) -> AdminRoomsPage {
        let config = SuiteConfig::default().with_action_timeout_ms(60);
        AdminRoomsPage::new(&Tab::new(page.clone(), Arc::new(config))).unwrap()
    }

    fn create_form(page: &FakePage) {
        for key in ["#roomName", "#type", "#accessible", "#roomPrice", "#createRoom"] {
            page.add(key, FakeElement::visible(""));
        }
        for feature in Feature::ALL {
            page.add(format!("#{}", feature.checkbox_id()), FakeElement::checkbox(false));
        }
    }

    #[tokio::test]
    async fn test_navigate_and_pattern() {
        let page = Arc::new(FakePage::new());
        let rooms = rooms_page(&page);
        rooms.navigate().await.unwrap();
        assert_eq!(page.visited(), vec!["http://localhost:3000/admin/rooms".to_string()]);
        assert_eq!(rooms.url_pattern(), "/admin/rooms");
        assert!(rooms.is_current("http://localhost:3000/admin/rooms"));
    }

    #[tokio::test]
    async fn test_create_room_fills_every_control() {
        let page = Arc::new(FakePage::new());
        create_form(&page);
        let rooms = rooms_page(&page);
        let room = NewRoom::new("666-1", RoomType::Suite)
            .with_accessible(true)
            .with_price(888)
            .with_features([Feature::WiFi, Feature::Tv]);
        rooms.create_room(&room).await.unwrap();

        assert_eq!(page.value_of("#roomName").as_deref(), Some("666-1"));
        assert_eq!(page.value_of("#type").as_deref(), Some("Suite"));
        assert_eq!(page.value_of("#accessible").as_deref(), Some("true"));
        assert_eq!(page.value_of("#roomPrice").as_deref(), Some("888"));
        assert!(page.is_checked("#wifiCheckbox"));
        assert!(page.is_checked("#tvCheckbox"));
        assert!(!page.is_checked("#safeCheckbox"));
        assert!(page.was_performed("#createRoom", &ElementAction::Click));
    }

    #[tokio::test]
    async fn test_create_room_reports_missing_control() {
        let page = Arc::new(FakePage::new());
        create_form(&page);
        page.remove("#createRoom");
        let rooms = rooms_page(&page);
        let err = rooms
            .create_room(&NewRoom::new("x", RoomType::Single))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("#createRoom"));
    }

    #[tokio::test]
    async fn test_wait_for_room_sees_new_row() {
        let page = Arc::new(FakePage::new());
        create_form(&page);
        page.on_click(
            "#createRoom",
            ClickEffect::Show(format!("{LISTING} >> has-text=\"666-2\"")),
        );
        let rooms = rooms_page(&page);
        rooms
            .create_room(&NewRoom::new("666-2", RoomType::Single))
            .await
            .unwrap();
        rooms.wait_for_room("666-2").await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_room_times_out() {
        let page = Arc::new(FakePage::new());
        let rooms = rooms_page(&page);
        let err = rooms.wait_for_room("ghost").await.unwrap_err();
        assert!(matches!(err, HotelError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_find_and_click_rows() {
        let page = Arc::new(FakePage::new());
        page.set_count(LISTING, 2);
        page.add(
            format!("{LISTING} >> nth=0 >> [id^=\"roomName\"]"),
            FakeElement::visible("101"),
        );
        page.add(
            format!("{LISTING} >> nth=1 >> [id^=\"roomName\"]"),
            FakeElement::visible("102"),
        );
        page.add(format!("{LISTING} >> nth=1"), FakeElement::visible("102"));
        let rooms = rooms_page(&page);

        let found = rooms.find_row("102").await.unwrap().unwrap();
        assert_eq!(found.index(), 1);
        assert!(rooms.find_row("999").await.unwrap().is_none());

        rooms.click_room_row(1).await.unwrap();
        assert!(page.was_performed(&format!("{LISTING} >> nth=1"), &ElementAction::Click));
        let err = tokio::time::timeout(Duration::from_secs(1), rooms.click_room_row(5))
            .await
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, HotelError::Timeout { .. }));
    }
}
