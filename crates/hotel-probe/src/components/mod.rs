//! Components: bounded regions of a page.
//!
//! A component is handed its root locator (the page itself for singleton
//! regions, or one row/card for repeated ones) and only reaches inside it.
//! Reads never fail on absence; actions time out when their target never
//! becomes actionable.

mod booking_card;
mod booking_dates;
mod feature_checklist;
mod login_form;
mod room_card;
mod room_row;

pub use booking_card::{BookingCard, Guest};
pub use booking_dates::BookingDates;
pub use feature_checklist::FeatureChecklist;
pub use login_form::LoginForm;
pub use room_card::{room_cards, RoomCard};
pub use room_row::{room_rows, RoomRow, RowSnapshot};

use crate::locator::{Locator, Selector};
use crate::result::HotelResult;
use crate::selectors::TRUTH_TOKEN;

/// Parse a leading integer the way a lenient form reader does.
///
/// Leading whitespace and one sign are accepted, digits are read up to the
/// first non-digit, and anything unparsable (including overflow) yields 0.
#[must_use]
pub fn parse_number(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let Ok(value) = rest[..digits_end].parse::<i64>() else {
        return 0;
    };
    if negative {
        -value
    } else {
        value
    }
}

/// Digits of a money string such as `£1,250`, 0 when there are none
#[must_use]
pub fn parse_amount(text: &str) -> i64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Scoped access to the parts of one region
#[derive(Debug, Clone)]
pub struct Region {
    root: Locator,
}

impl Region {
    /// Wrap a root locator
    #[must_use]
    pub const fn new(root: Locator) -> Self {
        Self { root }
    }

    /// The root locator
    #[must_use]
    pub const fn root(&self) -> &Locator {
        &self.root
    }

    /// Locator for a part inside the region
    #[must_use]
    pub fn part(&self, selector: Selector) -> Locator {
        self.root.locator(selector)
    }

    /// Fill a field
    ///
    /// # Errors
    ///
    /// Times out when the field never becomes actionable.
    pub async fn fill(&self, field: Selector, value: &str) -> HotelResult<()> {
        self.part(field).fill(value).await
    }

    /// Click a control
    ///
    /// # Errors
    ///
    /// Times out when the control never becomes actionable.
    pub async fn click(&self, action: Selector) -> HotelResult<()> {
        self.part(action).click().await
    }

    /// Trimmed text of a field, empty when absent
    ///
    /// # Errors
    ///
    /// Propagates driver failures only.
    pub async fn text(&self, field: Selector) -> HotelResult<String> {
        Ok(self.part(field).text_or_empty().await?.trim().to_string())
    }

    /// Whether a field reads as the truth token
    ///
    /// # Errors
    ///
    /// Propagates driver failures only.
    pub async fn flag(&self, field: Selector) -> HotelResult<bool> {
        Ok(self.text(field).await? == TRUTH_TOKEN)
    }

    /// Leading integer of a field, 0 when absent or unparsable
    ///
    /// # Errors
    ///
    /// Propagates driver failures only.
    pub async fn number(&self, field: Selector) -> HotelResult<i64> {
        Ok(parse_number(&self.part(field).text_or_empty().await?))
    }

    /// Whether the region root is visible
    ///
    /// # Errors
    ///
    /// Propagates driver failures only.
    pub async fn is_visible(&self) -> HotelResult<bool> {
        self.root.is_visible().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{FakeElement, FakePage};
    use proptest::prelude::*;
    use std::sync::Arc;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_number_cases() {
            assert_eq!(parse_number("888"), 888);
            assert_eq!(parse_number("  42 "), 42);
            assert_eq!(parse_number("-5"), -5);
            assert_eq!(parse_number("100abc"), 100);
            assert_eq!(parse_number("£100"), 0);
            assert_eq!(parse_number(""), 0);
            assert_eq!(parse_number("99999999999999999999"), 0);
        }

        #[test]
        fn test_parse_amount_cases() {
            assert_eq!(parse_amount("£1,250"), 1250);
            assert_eq!(parse_amount("Total: £200"), 200);
            assert_eq!(parse_amount("free"), 0);
        }

        proptest! {
            #[test]
            fn prop_parse_number_reads_any_integer(n in any::<i32>(), suffix in "[a-z ]{0,5}") {
                prop_assert_eq!(parse_number(&format!("{n}{suffix}")), i64::from(n));
            }

            #[test]
            fn prop_parse_number_never_panics(text in ".*") {
                let _ = parse_number(&text);
            }
        }
    }

    mod region_tests {
        use super::*;

        fn row_region(page: &Arc<FakePage>) -> Region {
            Region::new(Locator::new(page.clone(), Selector::test_id("roomlisting")).nth(0))
        }

        #[tokio::test]
        async fn test_reads_default_on_absence() {
            let page = Arc::new(FakePage::new());
            let region = row_region(&page);
            assert_eq!(region.text(Selector::css(".missing")).await.unwrap(), "");
            assert!(!region.flag(Selector::css(".missing")).await.unwrap());
            assert_eq!(region.number(Selector::css(".missing")).await.unwrap(), 0);
            assert!(!region.is_visible().await.unwrap());
        }

        #[tokio::test]
        async fn test_reads_are_scoped_to_root() {
            let page = Arc::new(FakePage::new());
            page.add(
                "[data-testid=\"roomlisting\"] >> nth=0 >> [id^=\"accessible\"]",
                FakeElement::visible("true"),
            );
            page.add("[id^=\"accessible\"]", FakeElement::visible("false"));
            let region = row_region(&page);
            assert!(region
                .flag(Selector::css("[id^=\"accessible\"]"))
                .await
                .unwrap());
        }

        #[tokio::test]
        async fn test_flag_requires_exact_token() {
            let page = Arc::new(FakePage::new());
            page.add(".flag", FakeElement::visible("True"));
            let region = Region::new(Locator::page(page));
            assert!(!region.flag(Selector::css(".flag")).await.unwrap());
        }
    }
}
