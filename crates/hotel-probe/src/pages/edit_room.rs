use std::collections::BTreeSet;

use super::{route_pattern, PageObject};
use crate::components::{FeatureChecklist, Region};
use crate::navigation::{AdminSite, Navigator, ReadyPage};
use crate::result::HotelResult;
use crate::selectors::{AdminSelector, Feature};
use crate::tab::Tab;

/// Admin detail page of one room
#[derive(Debug, Clone)]
pub struct AdminEditRoomPage {
    site: AdminSite,
    form: Region,
    features: FeatureChecklist,
    pattern: String,
}

impl AdminEditRoomPage {
    /// Edit page for the tab's admin site
    ///
    /// # Errors
    ///
    /// Fails when the admin base address is not a URL.
    pub fn new(tab: &Tab) -> HotelResult<Self> {
        let site = tab.admin()?;
        Ok(Self {
            pattern: route_pattern(&site, "room/:id"),
            form: Region::new(tab.page()),
            features: FeatureChecklist::new(tab.page()),
            site,
        })
    }

    /// Open the room with backend id `room_id`
    pub async fn navigate(&self, room_id: u64) -> HotelResult<ReadyPage> {
        self.site.goto(&format!("/room/{room_id}")).await
    }

    /// Switch the page into edit mode
    pub async fn click_edit(&self) -> HotelResult<()> {
        self.form.click(AdminSelector::EditButton.selector()).await
    }

    /// Replace the price and the feature set, then save
    ///
    /// # Errors
    ///
    /// Fails at the first control that never becomes actionable.
    pub async fn edit_room(&self, price: u32, features: &BTreeSet<Feature>) -> HotelResult<()> {
        tracing::info!(price, features = ?features, "editing room");
        self.click_edit().await?;
        self.form
            .fill(AdminSelector::EditPrice.selector(), &price.to_string())
            .await?;
        self.features.replace(features).await?;
        self.form.click(AdminSelector::UpdateButton.selector()).await
    }
}

impl PageObject for AdminEditRoomPage {
    fn url_pattern(&self) -> &str {
        &self.pattern
    }

    fn page_name(&self) -> &'static str {
        "admin edit room"
    }
}
