use std::collections::BTreeSet;

use crate::locator::Locator;
use crate::result::HotelResult;
use crate::selectors::Feature;

/// Feature checkboxes shared by the create and edit room forms
#[derive(Debug, Clone)]
pub struct FeatureChecklist {
    root: Locator,
}

impl FeatureChecklist {
    /// Checkboxes under `root`
    #[must_use]
    pub const fn new(root: Locator) -> Self {
        Self { root }
    }

    fn checkbox(&self, feature: Feature) -> Locator {
        self.root.locator(feature.checkbox())
    }

    /// Tick each feature, leaving others untouched
    ///
    /// # Errors
    ///
    /// Times out when a checkbox is not reachable.
    pub async fn tick(&self, features: &BTreeSet<Feature>) -> HotelResult<()> {
        for feature in features {
            self.checkbox(*feature).check().await?;
        }
        Ok(())
    }

    /// Make the ticked set exactly `features`
    ///
    /// # Errors
    ///
    /// Times out when a checkbox is not reachable.
    pub async fn replace(&self, features: &BTreeSet<Feature>) -> HotelResult<()> {
        tracing::debug!(features = ?features, "replacing feature set");
        for feature in Feature::ALL {
            self.checkbox(feature).uncheck().await?;
        }
        self.tick(features).await
    }
}
