//! Assertions for scenario steps.
//!
//! Plain value checks ([`expect_eq`], [`expect_true`], [`expect_contains`])
//! fail at once. Locator expectations ([`expect`]) retry until the page
//! settles within the locator's timeout and then report the last value seen.

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::locator::Locator;
use crate::result::{HotelError, HotelResult};
use crate::wait::DEFAULT_POLL_INTERVAL_MS;

/// Fail unless `actual == expected`
///
/// # Errors
///
/// Returns [`HotelError::AssertionFailed`] showing both values.
pub fn expect_eq<T: PartialEq + Debug>(what: &str, expected: T, actual: T) -> HotelResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(HotelError::assertion(what, expected, actual))
    }
}

/// Fail unless `condition` holds
///
/// # Errors
///
/// Returns [`HotelError::AssertionFailed`].
pub fn expect_true(what: &str, condition: bool) -> HotelResult<()> {
    expect_eq(what, true, condition)
}

/// Fail unless `haystack` contains `needle`
///
/// # Errors
///
/// Returns [`HotelError::AssertionFailed`] with the full haystack.
pub fn expect_contains(what: &str, haystack: &str, needle: &str) -> HotelResult<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(HotelError::AssertionFailed {
            what: what.to_string(),
            expected: format!("text containing {needle:?}"),
            actual: format!("{haystack:?}"),
        })
    }
}

/// Unwrap an option that must be present
///
/// # Errors
///
/// Returns [`HotelError::AssertionFailed`] when absent.
pub fn expect_some<T>(what: &str, value: Option<T>) -> HotelResult<T> {
    value.ok_or_else(|| HotelError::AssertionFailed {
        what: what.to_string(),
        expected: "present".to_string(),
        actual: "absent".to_string(),
    })
}

/// Retrying expectation on a locator
#[derive(Debug, Clone)]
pub struct Expect {
    locator: Locator,
}

/// Expectation on `locator`, e.g. `expect(alert).to_contain_text("size").await?`
#[must_use]
pub fn expect(locator: Locator) -> Expect {
    Expect::new(locator)
}

impl Expect {
    /// Create a new expectation for a locator
    #[must_use]
    pub const fn new(locator: Locator) -> Self {
        Self { locator }
    }

    async fn settle<T, F, Fut>(
        &self,
        what: &str,
        expected: String,
        mut read: F,
        accept: impl Fn(&T) -> bool,
    ) -> HotelResult<()>
    where
        T: Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = HotelResult<T>>,
    {
        let deadline = Instant::now() + self.locator.timeout();
        loop {
            let actual = read().await?;
            if accept(&actual) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HotelError::AssertionFailed {
                    what: format!("{what} of `{}`", self.locator.description()),
                    expected,
                    actual: format!("{actual:?}"),
                });
            }
            sleep(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)).await;
        }
    }

    /// Element becomes visible
    pub async fn to_be_visible(&self) -> HotelResult<()> {
        self.settle("visibility", "true".to_string(), || self.locator.is_visible(), |v| *v)
            .await
    }

    /// Element becomes hidden or absent
    pub async fn to_be_hidden(&self) -> HotelResult<()> {
        self.settle("visibility", "false".to_string(), || self.locator.is_visible(), |v| !*v)
            .await
    }

    /// Trimmed text equals `expected`
    pub async fn to_have_text(&self, expected: &str) -> HotelResult<()> {
        self.settle(
            "text",
            format!("{expected:?}"),
            || async { Ok::<_, HotelError>(self.locator.text_or_empty().await?.trim().to_string()) },
            |text| text == expected,
        )
        .await
    }

    /// Text contains `needle`
    pub async fn to_contain_text(&self, needle: &str) -> HotelResult<()> {
        self.settle(
            "text",
            format!("text containing {needle:?}"),
            || self.locator.text_or_empty(),
            |text| text.contains(needle),
        )
        .await
    }

    /// Exactly `expected` matches
    pub async fn to_have_count(&self, expected: usize) -> HotelResult<()> {
        self.settle(
            "count",
            expected.to_string(),
            || self.locator.count(),
            |count| *count == expected,
        )
        .await
    }
}
