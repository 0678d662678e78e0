//! Locator descriptors for element selection and interaction.
//!
//! # Design Philosophy
//!
//! - **Lazy**: building or chaining a locator never touches the page; every
//!   action or query re-resolves the chain against the current DOM
//! - **Auto-Waiting**: actions poll until exactly one visible match exists
//! - **Strict Selection**: an action that resolves to several elements fails
//! - **Forgiving Reads**: text and visibility reads on a missing element return
//!   empty/false instead of failing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::driver::PageDriver;
use crate::result::{HotelError, HotelResult};
use crate::wait::{wait_until, DEFAULT_POLL_INTERVAL_MS};

/// Default timeout for auto-waiting (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css {
        /// CSS source
        css: String,
    },
    /// Deepest element whose text contains the value
    Text {
        /// Text to find
        text: String,
    },
    /// Test ID selector (data-testid attribute)
    TestId {
        /// Test id
        id: String,
    },
    /// Form control associated with a label
    Label {
        /// Label text
        label: String,
    },
    /// ARIA role with accessible name
    Role {
        /// Role such as `button`
        role: String,
        /// Accessible name
        name: String,
    },
    /// CSS selector filtered by contained text
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(css: impl Into<String>) -> Self {
        Self::Css { css: css.into() }
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId { id: id.into() }
    }

    /// Create a label selector
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self::Label {
            label: label.into(),
        }
    }

    /// Create a role selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Create a CSS selector with a text filter
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css { css } => f.write_str(css),
            Self::Text { text } => write!(f, "text={text:?}"),
            Self::TestId { id } => write!(f, "[data-testid={id:?}]"),
            Self::Label { label } => write!(f, "label={label:?}"),
            Self::Role { role, name } => write!(f, "role={role}[name={name:?}]"),
            Self::CssWithText { css, text } => write!(f, "{css}:has-text({text:?})"),
        }
    }
}

/// One link in a locator chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Descend into matches of a selector
    Select {
        /// Selector to apply inside every current match
        selector: Selector,
    },
    /// Keep matches whose text contains the value
    HasText {
        /// Text to keep
        text: String,
    },
    /// Keep the match at an index
    Nth {
        /// Zero-based index
        index: usize,
    },
    /// Keep the last match
    Last,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select { selector } => write!(f, "{selector}"),
            Self::HasText { text } => write!(f, "has-text={text:?}"),
            Self::Nth { index } => write!(f, "nth={index}"),
            Self::Last => f.write_str("nth=-1"),
        }
    }
}

/// An ordered chain of steps, resolved from the document root.
///
/// An empty query addresses the page itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Query {
    steps: Vec<Step>,
}

impl Query {
    /// Query addressing the page itself
    #[must_use]
    pub const fn root() -> Self {
        Self { steps: Vec::new() }
    }

    /// Query for a single selector
    #[must_use]
    pub fn of(selector: Selector) -> Self {
        Self::root().then(Step::Select { selector })
    }

    /// Append a step
    #[must_use]
    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Steps in resolution order
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether the query addresses the page itself
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Canonical description, used in errors and as the fake page key
    #[must_use]
    pub fn describe(&self) -> String {
        if self.steps.is_empty() {
            return "page".to_string();
        }
        self.steps
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" >> ")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Primitive actions a driver performs on one resolved element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ElementAction {
    /// Click the element
    Click,
    /// Replace the element's value
    Fill(String),
    /// Ensure a checkbox is checked
    Check,
    /// Ensure a checkbox is unchecked
    Uncheck,
    /// Choose an option of a select element by value or label
    SelectOption(String),
    /// Scroll the element into view if needed
    ScrollIntoView,
}

impl ElementAction {
    /// Verb used in timeout messages
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Fill(_) => "fill",
            Self::Check => "check",
            Self::Uncheck => "uncheck",
            Self::SelectOption(_) => "select option in",
            Self::ScrollIntoView => "scroll to",
        }
    }

    /// Whether the element must be visible before acting
    #[must_use]
    pub const fn needs_visibility(&self) -> bool {
        !matches!(self, Self::ScrollIntoView)
    }
}

/// Element states a locator can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    /// At least one match is visible
    Visible,
    /// No match is visible
    Hidden,
    /// At least one match exists
    Attached,
    /// No match exists
    Detached,
}

impl ElementState {
    const fn verb(self) -> &'static str {
        match self {
            Self::Visible => "see",
            Self::Hidden => "stop seeing",
            Self::Attached => "find",
            Self::Detached => "lose",
        }
    }
}

/// A lazily resolved handle to zero or more elements.
#[derive(Clone)]
pub struct Locator {
    driver: Arc<dyn PageDriver>,
    query: Query,
    timeout: Duration,
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("query", &self.query.describe())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Locator {
    /// Locator for the page itself
    #[must_use]
    pub fn page(driver: Arc<dyn PageDriver>) -> Self {
        Self {
            driver,
            query: Query::root(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Locator for a selector, resolved from the page root
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, selector: Selector) -> Self {
        Self::page(driver).locator(selector)
    }

    /// Locator for a selector inside every current match
    #[must_use]
    pub fn locator(&self, selector: Selector) -> Self {
        self.chain(Step::Select { selector })
    }

    /// Keep only the match at `index`
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        self.chain(Step::Nth { index })
    }

    /// Keep only the first match
    #[must_use]
    pub fn first(&self) -> Self {
        self.nth(0)
    }

    /// Keep only the last match
    #[must_use]
    pub fn last(&self) -> Self {
        self.chain(Step::Last)
    }

    /// Keep matches containing `text`
    #[must_use]
    pub fn filter_text(&self, text: impl Into<String>) -> Self {
        self.chain(Step::HasText { text: text.into() })
    }

    /// Set a custom timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn chain(&self, step: Step) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            query: self.query.clone().then(step),
            timeout: self.timeout,
        }
    }

    /// Get the query
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Get the timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Canonical description of the chain
    #[must_use]
    pub fn description(&self) -> String {
        self.query.describe()
    }

    /// Number of current matches
    pub async fn count(&self) -> HotelResult<usize> {
        self.driver.count(&self.query).await
    }

    /// Text content of the first match, or an empty string when absent
    pub async fn text_or_empty(&self) -> HotelResult<String> {
        Ok(self
            .driver
            .text_content(&self.query)
            .await?
            .unwrap_or_default())
    }

    /// Text content of every match
    pub async fn all_texts(&self) -> HotelResult<Vec<String>> {
        self.driver.all_text_contents(&self.query).await
    }

    /// Attribute of the first match, `None` when absent
    pub async fn attribute(&self, name: &str) -> HotelResult<Option<String>> {
        self.driver.attribute(&self.query, name).await
    }

    /// Whether the first match is visible; `false` when absent
    pub async fn is_visible(&self) -> HotelResult<bool> {
        self.driver.is_visible(&self.query).await
    }

    /// Click the element
    pub async fn click(&self) -> HotelResult<()> {
        self.act(ElementAction::Click).await
    }

    /// Fill the element with text
    pub async fn fill(&self, value: impl Into<String>) -> HotelResult<()> {
        self.act(ElementAction::Fill(value.into())).await
    }

    /// Check a checkbox
    pub async fn check(&self) -> HotelResult<()> {
        self.act(ElementAction::Check).await
    }

    /// Uncheck a checkbox
    pub async fn uncheck(&self) -> HotelResult<()> {
        self.act(ElementAction::Uncheck).await
    }

    /// Select an option by value or label
    pub async fn select_option(&self, value: impl Into<String>) -> HotelResult<()> {
        self.act(ElementAction::SelectOption(value.into())).await
    }

    /// Scroll the element into view if needed
    pub async fn scroll_into_view(&self) -> HotelResult<()> {
        self.act(ElementAction::ScrollIntoView).await
    }

    /// Wait until the element reaches a state
    pub async fn wait_for(&self, state: ElementState) -> HotelResult<()> {
        let driver = &self.driver;
        let query = &self.query;
        wait_until(
            state.verb(),
            &self.description(),
            self.timeout,
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            || async move {
                Ok::<bool, HotelError>(match state {
                    ElementState::Visible => driver.is_visible(query).await?,
                    ElementState::Hidden => !driver.is_visible(query).await?,
                    ElementState::Attached => driver.count(query).await? > 0,
                    ElementState::Detached => driver.count(query).await? == 0,
                })
            },
        )
        .await
    }

    /// Wait for exactly one actionable match, then perform the action
    pub async fn act(&self, action: ElementAction) -> HotelResult<()> {
        let target = self.description();
        let driver = &self.driver;
        let query = &self.query;
        let needs_visibility = action.needs_visibility();
        wait_until(
            action.verb(),
            &target,
            self.timeout,
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            || {
                let target = target.clone();
                async move {
                    match driver.count(query).await? {
                        0 => Ok::<bool, HotelError>(false),
                        1 if needs_visibility => driver.is_visible(query).await,
                        1 => Ok(true),
                        count => Err(HotelError::StrictMode { target, count }),
                    }
                }
            },
        )
        .await?;
        tracing::debug!(selector = %target, action = action.verb(), "perform");
        self.driver.perform(&self.query, &action).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::{FakeElement, FakePage};

    fn fast(locator: Locator) -> Locator {
        locator.with_timeout(Duration::from_millis(60))
    }

    mod selector_tests {
        use super::*;

        #[test]
        fn test_display_forms() {
            assert_eq!(Selector::css("#roomName").to_string(), "#roomName");
            assert_eq!(
                Selector::test_id("roomlisting").to_string(),
                "[data-testid=\"roomlisting\"]"
            );
            assert_eq!(
                Selector::role("button", "Login").to_string(),
                "role=button[name=\"Login\"]"
            );
            assert_eq!(
                Selector::css_with_text("button", "Edit").to_string(),
                "button:has-text(\"Edit\")"
            );
            assert_eq!(Selector::label("Username").to_string(), "label=\"Username\"");
        }

        #[test]
        fn test_serializes_with_kind_tag() {
            let json = serde_json::to_value(Selector::css("#type")).unwrap();
            assert_eq!(json["kind"], "css");
            assert_eq!(json["css"], "#type");
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_root_describes_page() {
            assert!(Query::root().is_root());
            assert_eq!(Query::root().describe(), "page");
        }

        #[test]
        fn test_chain_description() {
            let query = Query::of(Selector::css("#booking"))
                .then(Step::Select {
                    selector: Selector::css("input.form-control"),
                })
                .then(Step::Last);
            assert_eq!(query.describe(), "#booking >> input.form-control >> nth=-1");
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_chaining_does_not_touch_page() {
            let page = Arc::new(FakePage::new());
            let rows = Locator::new(page.clone(), Selector::test_id("roomlisting"));
            let cell = rows.nth(2).locator(Selector::css("[id^=\"type\"]"));
            assert_eq!(
                cell.description(),
                "[data-testid=\"roomlisting\"] >> nth=2 >> [id^=\"type\"]"
            );
            assert!(page.history().is_empty());
        }

        #[tokio::test]
        async fn test_missing_text_reads_empty() {
            let page = Arc::new(FakePage::new());
            let title = Locator::new(page, Selector::css("h1.fw-bold"));
            assert_eq!(title.text_or_empty().await.unwrap(), "");
            assert!(!title.is_visible().await.unwrap());
        }

        #[tokio::test]
        async fn test_reads_are_idempotent() {
            let page = Arc::new(FakePage::new());
            page.add("h1.fw-bold", FakeElement::visible("Single Room"));
            let title = Locator::new(page, Selector::css("h1.fw-bold"));
            let first = title.text_or_empty().await.unwrap();
            let second = title.text_or_empty().await.unwrap();
            assert_eq!(first, second);
            assert_eq!(first, "Single Room");
        }

        #[tokio::test]
        async fn test_click_on_missing_element_times_out() {
            let page = Arc::new(FakePage::new());
            let button = fast(Locator::new(page, Selector::css("#createRoom")));
            let err = button.click().await.unwrap_err();
            match err {
                HotelError::Timeout { action, target, .. } => {
                    assert_eq!(action, "click");
                    assert_eq!(target, "#createRoom");
                }
                other => panic!("unexpected error {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_click_on_hidden_element_times_out() {
            let page = Arc::new(FakePage::new());
            page.add("#createRoom", FakeElement::hidden());
            let button = fast(Locator::new(page, Selector::css("#createRoom")));
            assert!(matches!(
                button.click().await,
                Err(HotelError::Timeout { .. })
            ));
        }

        #[tokio::test]
        async fn test_action_on_many_matches_is_strict_violation() {
            let page = Arc::new(FakePage::new());
            page.set_count("button", 3);
            let button = fast(Locator::new(page, Selector::css("button")));
            let err = button.click().await.unwrap_err();
            assert!(matches!(err, HotelError::StrictMode { count: 3, .. }));
        }

        #[tokio::test]
        async fn test_fill_records_value() {
            let page = Arc::new(FakePage::new());
            page.add("#roomName", FakeElement::visible(""));
            let input = fast(Locator::new(page.clone(), Selector::css("#roomName")));
            input.fill("101").await.unwrap();
            assert_eq!(page.value_of("#roomName").as_deref(), Some("101"));
        }

        #[tokio::test]
        async fn test_scroll_does_not_need_visibility() {
            let page = Arc::new(FakePage::new());
            page.add("#rooms", FakeElement::hidden());
            let section = fast(Locator::new(page.clone(), Selector::css("#rooms")));
            section.scroll_into_view().await.unwrap();
            assert!(page.was_performed("#rooms", &ElementAction::ScrollIntoView));
        }

        #[tokio::test]
        async fn test_wait_for_visible_and_detached() {
            let page = Arc::new(FakePage::new());
            page.add(".alert-danger", FakeElement::visible("size must be between 3 and 18"));
            let alert = fast(Locator::new(page.clone(), Selector::css(".alert-danger")));
            alert.wait_for(ElementState::Visible).await.unwrap();
            assert!(alert.wait_for(ElementState::Detached).await.is_err());
            alert.wait_for(ElementState::Attached).await.unwrap();
        }
    }
}
