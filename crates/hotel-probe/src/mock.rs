//! Scripted in-memory page for testing page objects without a browser.
//!
//! Elements are keyed by the canonical description of the query that finds
//! them (see [`Query::describe`]). Collections are modelled by setting a
//! count on the collection key and adding elements under `key >> nth=i`.
//!
//! ```rust,ignore
//! let page = FakePage::new();
//! page.add("#createRoom", FakeElement::visible("Create"));
//! page.on_click("#createRoom", ClickEffect::Show("[data-testid=\"roomlisting\"]".into()));
//! ```
//!
//! Reactions that depend on state outside the page, such as a backend the
//! test also talks to, are written as hooks ([`FakePage::on_click_with`],
//! [`FakePage::on_goto_with`], [`FakePage::on_request`]). Hooks run after the
//! page state is released and may script the page further.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::SuiteConfig;
use crate::driver::PageDriver;
use crate::locator::{ElementAction, Query, Step};
use crate::network::{CapturedRequest, HttpMethod, ObserverId, RequestFilter};
use crate::result::{HotelError, HotelResult};
use crate::tab::{Tab, TabFactory};
use crate::wait::LoadState;

/// One fake DOM element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeElement {
    /// Text content
    pub text: String,
    /// Rendered and visible
    pub visible: bool,
    /// Input value
    pub value: String,
    /// Checkbox state
    pub checked: bool,
    /// Attributes
    pub attributes: HashMap<String, String>,
}

impl FakeElement {
    /// A visible element with text
    #[must_use]
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            ..Self::default()
        }
    }

    /// An attached but hidden element
    #[must_use]
    pub fn hidden() -> Self {
        Self::default()
    }

    /// A visible checkbox
    #[must_use]
    pub fn checkbox(checked: bool) -> Self {
        Self {
            visible: true,
            checked,
            ..Self::default()
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// One body field of a [`FormPost`], read from a form control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    /// Control value as a string
    Text {
        /// JSON key
        name: String,
        /// Element key of the control
        control: String,
    },
    /// Control value as a number, the raw string when it does not parse
    Number {
        /// JSON key
        name: String,
        /// Element key of the control
        control: String,
    },
    /// Control value compared with `"true"`
    Flag {
        /// JSON key
        name: String,
        /// Element key of the control
        control: String,
    },
    /// Appends `value` to the array `name` when the checkbox is ticked
    Ticked {
        /// JSON key of the array
        name: String,
        /// Element key of the checkbox
        control: String,
        /// Entry added when ticked
        value: String,
    },
}

/// Request whose JSON body is taken from the form when the click happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPost {
    /// Request URL
    pub url: String,
    /// Request method
    pub method: HttpMethod,
    /// Body fields in order
    pub fields: Vec<FormField>,
}

impl FormPost {
    /// A body-less form submission
    #[must_use]
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            fields: Vec::new(),
        }
    }

    /// Add a body field
    #[must_use]
    pub fn field(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Scripted reaction to a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    /// Change the document URL
    Navigate(String),
    /// Make an element visible, attaching it if needed
    Show(String),
    /// Hide an element
    Hide(String),
    /// Detach an element
    Remove(String),
    /// Attach or replace an element
    Insert(String, FakeElement),
    /// Replace an element's text
    SetText(String, String),
    /// Emit a network request to installed observers
    Request(CapturedRequest),
    /// Emit a request built from the current form values
    PostForm(FormPost),
}

/// Recorded driver interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeEvent {
    /// `goto` was called
    Goto(String),
    /// An action ran on an element
    Perform {
        /// Element key
        target: String,
        /// Action performed
        action: ElementAction,
    },
}

#[derive(Debug, Default)]
struct PageState {
    url: String,
    elements: HashMap<String, FakeElement>,
    counts: HashMap<String, usize>,
    click_effects: HashMap<String, Vec<ClickEffect>>,
    goto_effects: HashMap<String, Vec<ClickEffect>>,
    history: Vec<FakeEvent>,
    observers: Vec<(ObserverId, RequestFilter, Vec<CapturedRequest>)>,
    emitted: Vec<CapturedRequest>,
    next_observer: u64,
    closed: bool,
}

impl PageState {
    fn count(&self, key: &str) -> usize {
        self.counts
            .get(key)
            .copied()
            .unwrap_or_else(|| usize::from(self.elements.contains_key(key)))
    }

    fn first(&self, query: &Query) -> Option<&FakeElement> {
        let key = query.describe();
        self.elements.get(&key).or_else(|| {
            (self.count(&key) > 0)
                .then(|| nth_key(query, 0))
                .and_then(|k| self.elements.get(&k))
        })
    }

    fn apply(&mut self, effect: ClickEffect) {
        match effect {
            ClickEffect::Navigate(url) => self.url = url,
            ClickEffect::Show(key) => self.elements.entry(key).or_default().visible = true,
            ClickEffect::Hide(key) => {
                if let Some(element) = self.elements.get_mut(&key) {
                    element.visible = false;
                }
            }
            ClickEffect::Remove(key) => {
                self.elements.remove(&key);
            }
            ClickEffect::Insert(key, element) => {
                self.elements.insert(key, element);
            }
            ClickEffect::SetText(key, text) => self.elements.entry(key).or_default().text = text,
            ClickEffect::Request(request) => self.emit(request),
            ClickEffect::PostForm(post) => {
                let body = self.form_body(&post.fields);
                let request = CapturedRequest::new(post.url, post.method)
                    .with_header("Content-Type", "application/json")
                    .with_body(body.to_string());
                self.emit(request);
            }
        }
    }

    fn emit(&mut self, request: CapturedRequest) {
        for (_, filter, captured) in &mut self.observers {
            if filter.matches(&request) {
                captured.push(request.clone());
            }
        }
        self.emitted.push(request);
    }

    fn value_of(&self, key: &str) -> String {
        self.elements
            .get(key)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    fn form_body(&self, fields: &[FormField]) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        for field in fields {
            match field {
                FormField::Text { name, control } => {
                    body.insert(name.clone(), self.value_of(control).into());
                }
                FormField::Number { name, control } => {
                    let raw = self.value_of(control);
                    let value = raw
                        .trim()
                        .parse::<u64>()
                        .map_or_else(|_| raw.into(), serde_json::Value::from);
                    body.insert(name.clone(), value);
                }
                FormField::Flag { name, control } => {
                    body.insert(name.clone(), (self.value_of(control) == "true").into());
                }
                FormField::Ticked {
                    name,
                    control,
                    value,
                } => {
                    let list = body
                        .entry(name.clone())
                        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
                    let ticked = self.elements.get(control).is_some_and(|e| e.checked);
                    if let (true, serde_json::Value::Array(items)) = (ticked, list) {
                        items.push(value.clone().into());
                    }
                }
            }
        }
        serde_json::Value::Object(body)
    }
}

type PageHook = Arc<dyn Fn(&FakePage) + Send + Sync>;
type RequestHook = Arc<dyn Fn(&FakePage, &CapturedRequest) + Send + Sync>;

#[derive(Default)]
struct Hooks {
    click: HashMap<String, Vec<PageHook>>,
    goto: HashMap<String, Vec<PageHook>>,
    request: Vec<RequestHook>,
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("click", &self.click.keys().collect::<Vec<_>>())
            .field("goto", &self.goto.keys().collect::<Vec<_>>())
            .field("request", &self.request.len())
            .finish()
    }
}

fn nth_key(query: &Query, index: usize) -> String {
    query.clone().then(Step::Nth { index }).describe()
}

/// In-memory [`PageDriver`] with scripted elements and reactions
#[derive(Debug, Default)]
pub struct FakePage {
    state: Mutex<PageState>,
    hooks: Mutex<Hooks>,
}

impl FakePage {
    /// Create an empty page at `about:blank`
    #[must_use]
    pub fn new() -> Self {
        let page = Self::default();
        page.state().url = "about:blank".to_string();
        page
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hooks(&self) -> MutexGuard<'_, Hooks> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `hooks`, then the request hooks for everything emitted so far.
    /// Must be called without the state lock held.
    fn run_hooks(&self, hooks: Vec<PageHook>) {
        for hook in hooks {
            hook(self);
        }
        loop {
            let emitted = std::mem::take(&mut self.state().emitted);
            if emitted.is_empty() {
                return;
            }
            let request_hooks = self.hooks().request.clone();
            for request in &emitted {
                for hook in &request_hooks {
                    hook(self, request);
                }
            }
        }
    }

    /// Attach an element under a query key
    pub fn add(&self, key: impl Into<String>, element: FakeElement) {
        self.state().elements.insert(key.into(), element);
    }

    /// Detach an element
    pub fn remove(&self, key: &str) {
        self.state().elements.remove(key);
    }

    /// Declare how many elements a collection key resolves to
    pub fn set_count(&self, key: impl Into<String>, count: usize) {
        self.state().counts.insert(key.into(), count);
    }

    /// Replace an element's text, attaching a visible element if absent
    pub fn set_text(&self, key: impl Into<String>, text: impl Into<String>) {
        let mut state = self.state();
        let element = state
            .elements
            .entry(key.into())
            .or_insert_with(|| FakeElement::visible(""));
        element.text = text.into();
    }

    /// Set the document URL directly
    pub fn set_url(&self, url: impl Into<String>) {
        self.state().url = url.into();
    }

    /// Script a reaction to clicking an element
    pub fn on_click(&self, key: impl Into<String>, effect: ClickEffect) {
        self.state()
            .click_effects
            .entry(key.into())
            .or_default()
            .push(effect);
    }

    /// Script a reaction to navigating to an exact URL
    pub fn on_goto(&self, url: impl Into<String>, effect: ClickEffect) {
        self.state()
            .goto_effects
            .entry(url.into())
            .or_default()
            .push(effect);
    }

    /// Run `hook` after every click on an element, once the scripted
    /// effects are applied
    pub fn on_click_with(
        &self,
        key: impl Into<String>,
        hook: impl Fn(&Self) + Send + Sync + 'static,
    ) {
        self.hooks()
            .click
            .entry(key.into())
            .or_default()
            .push(Arc::new(hook));
    }

    /// Run `hook` after every navigation to an exact URL
    pub fn on_goto_with(
        &self,
        url: impl Into<String>,
        hook: impl Fn(&Self) + Send + Sync + 'static,
    ) {
        self.hooks()
            .goto
            .entry(url.into())
            .or_default()
            .push(Arc::new(hook));
    }

    /// Run `hook` for every request the page emits
    pub fn on_request(&self, hook: impl Fn(&Self, &CapturedRequest) + Send + Sync + 'static) {
        self.hooks().request.push(Arc::new(hook));
    }

    /// Emit a request as if the page had sent it
    pub fn emit(&self, request: CapturedRequest) {
        self.state().emit(request);
        self.run_hooks(Vec::new());
    }

    /// Current URL
    #[must_use]
    pub fn url(&self) -> String {
        self.state().url.clone()
    }

    /// Every recorded interaction, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<FakeEvent> {
        self.state().history.clone()
    }

    /// URLs passed to `goto`
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.state()
            .history
            .iter()
            .filter_map(|event| match event {
                FakeEvent::Goto(url) => Some(url.clone()),
                FakeEvent::Perform { .. } => None,
            })
            .collect()
    }

    /// Actions performed on one element key
    #[must_use]
    pub fn actions_on(&self, key: &str) -> Vec<ElementAction> {
        self.state()
            .history
            .iter()
            .filter_map(|event| match event {
                FakeEvent::Perform { target, action } if target == key => Some(action.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether an action ran on an element key
    #[must_use]
    pub fn was_performed(&self, key: &str, action: &ElementAction) -> bool {
        self.actions_on(key).iter().any(|a| a == action)
    }

    /// Current input value of an element
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<String> {
        self.state().elements.get(key).map(|e| e.value.clone())
    }

    /// Checkbox state of an element, `false` when absent
    #[must_use]
    pub fn is_checked(&self, key: &str) -> bool {
        self.state().elements.get(key).is_some_and(|e| e.checked)
    }

    /// Whether `close` was called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state().closed
    }
}

#[async_trait]
impl PageDriver for FakePage {
    async fn goto(&self, url: &str, _wait_until: LoadState, _timeout: Duration) -> HotelResult<()> {
        {
            let mut state = self.state();
            state.history.push(FakeEvent::Goto(url.to_string()));
            state.url = url.to_string();
            let effects = state.goto_effects.get(url).cloned().unwrap_or_default();
            for effect in effects {
                state.apply(effect);
            }
        }
        let hooks = self.hooks().goto.get(url).cloned().unwrap_or_default();
        self.run_hooks(hooks);
        Ok(())
    }

    async fn current_url(&self) -> HotelResult<String> {
        Ok(self.url())
    }

    async fn count(&self, query: &Query) -> HotelResult<usize> {
        Ok(self.state().count(&query.describe()))
    }

    async fn text_content(&self, query: &Query) -> HotelResult<Option<String>> {
        Ok(self.state().first(query).map(|e| e.text.clone()))
    }

    async fn all_text_contents(&self, query: &Query) -> HotelResult<Vec<String>> {
        let state = self.state();
        let key = query.describe();
        if let Some(&count) = state.counts.get(&key) {
            return Ok((0..count)
                .map(|i| {
                    state
                        .elements
                        .get(&nth_key(query, i))
                        .map(|e| e.text.clone())
                        .unwrap_or_default()
                })
                .collect());
        }
        Ok(state
            .elements
            .get(&key)
            .map(|e| vec![e.text.clone()])
            .unwrap_or_default())
    }

    async fn attribute(&self, query: &Query, name: &str) -> HotelResult<Option<String>> {
        Ok(self
            .state()
            .first(query)
            .and_then(|e| e.attributes.get(name).cloned()))
    }

    async fn is_visible(&self, query: &Query) -> HotelResult<bool> {
        Ok(self.state().first(query).is_some_and(|e| e.visible))
    }

    async fn perform(&self, query: &Query, action: &ElementAction) -> HotelResult<()> {
        let key = query.describe();
        {
            let mut state = self.state();
            let element = state
                .elements
                .get_mut(&key)
                .ok_or_else(|| HotelError::driver(format!("no element for `{key}`")))?;
            match action {
                ElementAction::Fill(value) | ElementAction::SelectOption(value) => {
                    element.value.clone_from(value);
                }
                ElementAction::Check => element.checked = true,
                ElementAction::Uncheck => element.checked = false,
                ElementAction::Click | ElementAction::ScrollIntoView => {}
            }
            state.history.push(FakeEvent::Perform {
                target: key.clone(),
                action: action.clone(),
            });
            if *action == ElementAction::Click {
                let effects = state.click_effects.get(&key).cloned().unwrap_or_default();
                for effect in effects {
                    state.apply(effect);
                }
            }
        }
        let hooks = if *action == ElementAction::Click {
            self.hooks().click.get(&key).cloned().unwrap_or_default()
        } else {
            Vec::new()
        };
        self.run_hooks(hooks);
        Ok(())
    }

    async fn observe_requests(&self, filter: &RequestFilter) -> HotelResult<ObserverId> {
        let mut state = self.state();
        state.next_observer += 1;
        let id = ObserverId(state.next_observer);
        state.observers.push((id, filter.clone(), Vec::new()));
        Ok(id)
    }

    async fn captured_requests(&self, observer: ObserverId) -> HotelResult<Vec<CapturedRequest>> {
        self.state()
            .observers
            .iter()
            .find(|(id, _, _)| *id == observer)
            .map(|(_, _, captured)| captured.clone())
            .ok_or_else(|| HotelError::driver(format!("unknown observer {}", observer.0)))
    }

    async fn close(&self) -> HotelResult<()> {
        self.state().closed = true;
        Ok(())
    }
}

type PageScript = Box<dyn Fn(&FakePage) + Send + Sync>;

/// [`TabFactory`] handing out freshly scripted fake pages
pub struct FakeBrowser {
    script: PageScript,
    opened: Mutex<Vec<Arc<FakePage>>>,
}

impl std::fmt::Debug for FakeBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeBrowser")
            .field("opened", &self.opened().len())
            .finish_non_exhaustive()
    }
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self::new(|_| {})
    }
}

impl FakeBrowser {
    /// Every opened page runs `script` first
    pub fn new(script: impl Fn(&FakePage) + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Pages handed out so far
    #[must_use]
    pub fn opened(&self) -> Vec<Arc<FakePage>> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TabFactory for FakeBrowser {
    async fn open_tab(&self, config: Arc<SuiteConfig>) -> HotelResult<Tab> {
        let page = Arc::new(FakePage::new());
        (self.script)(&page);
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&page));
        Ok(Tab::new(page, config))
    }
}
