//! Chromium driver over the Chrome `DevTools` Protocol.
//!
//! Queries are resolved inside the page by a fixed JavaScript resolver that
//! walks the serialized [`Query`] steps. Every evaluation returns a JSON
//! string so absent values survive the protocol round trip unchanged.
//! Requests are recorded from the protocol's `Network.requestWillBeSent`
//! events, so captures outlive document loads and carry the posted body
//! whatever the page used to send it.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::network::{EnableParams, EventRequestWillBeSent};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::config::SuiteConfig;
use crate::driver::{DriverConfig, PageDriver};
use crate::locator::{ElementAction, Query};
use crate::network::{CapturedRequest, HttpMethod, ObserverId, RequestFilter};
use crate::result::{HotelError, HotelResult};
use crate::tab::{Tab, TabFactory};
use crate::wait::{wait_until, LoadState, DEFAULT_POLL_INTERVAL_MS, NETWORK_IDLE_THRESHOLD_MS};

/// In-page resolver. Defines `resolve(steps)` and `visible(el)`.
const RESOLVER: &str = r#"
const textOf = el => (el.textContent || '');
const visible = el => {
  if (!el || !el.isConnected) return false;
  const style = getComputedStyle(el);
  const rect = el.getBoundingClientRect();
  return style.visibility !== 'hidden' && style.display !== 'none' && (rect.width > 0 || rect.height > 0);
};
const implicitRoles = {
  button: 'button,input[type=submit],input[type=button]',
  link: 'a[href]',
  textbox: 'input:not([type]),input[type=text],input[type=email],textarea',
  checkbox: 'input[type=checkbox]',
};
const accessibleName = el => (el.getAttribute('aria-label') || textOf(el).trim() || el.value || '');
const within = (root, sel) => {
  switch (sel.kind) {
    case 'css':
      return [...root.querySelectorAll(sel.css)];
    case 'css_with_text':
      return [...root.querySelectorAll(sel.css)].filter(e => textOf(e).includes(sel.text));
    case 'test_id':
      return [...root.querySelectorAll(`[data-testid="${CSS.escape(sel.id)}"]`)];
    case 'text': {
      const hits = [...root.querySelectorAll('*')].filter(e => textOf(e).includes(sel.text));
      return hits.filter(e => ![...e.children].some(c => textOf(c).includes(sel.text)));
    }
    case 'label': {
      const out = [];
      for (const label of root.querySelectorAll('label')) {
        if (textOf(label).trim() !== sel.label) continue;
        const control = label.control || (label.htmlFor ? document.getElementById(label.htmlFor) : null);
        if (control) out.push(control);
      }
      for (const el of root.querySelectorAll('[aria-label]')) {
        if (el.getAttribute('aria-label') === sel.label) out.push(el);
      }
      return out;
    }
    case 'role': {
      const extra = implicitRoles[sel.role];
      const css = `[role="${CSS.escape(sel.role)}"]` + (extra ? ',' + extra : '');
      return [...root.querySelectorAll(css)].filter(e => accessibleName(e) === sel.name);
    }
    default:
      return [];
  }
};
const resolve = steps => {
  let current = [document];
  for (const step of steps) {
    switch (step.op) {
      case 'select': {
        const next = [];
        for (const root of current) {
          for (const el of within(root, step.selector)) {
            if (!next.includes(el)) next.push(el);
          }
        }
        current = next;
        break;
      }
      case 'has_text':
        current = current.filter(e => textOf(e).includes(step.text));
        break;
      case 'nth':
        current = current.length > step.index ? [current[step.index]] : [];
        break;
      case 'last':
        current = current.length ? [current[current.length - 1]] : [];
        break;
    }
  }
  return current.map(e => (e === document ? document.body : e));
};
"#;

/// Wrap `body` so it runs against the elements `query` resolves to as `els`
/// and returns its value JSON-encoded.
fn query_script(query: &Query, body: &str) -> HotelResult<String> {
    let steps = serde_json::to_string(query.steps())?;
    Ok(format!(
        "(() => {{ {RESOLVER}\nconst els = resolve({steps});\nreturn JSON.stringify((() => {{ {body} }})()); }})()"
    ))
}

/// Script performing `action` on the single resolved element. Returns `null`
/// on success or a message describing why the action was refused.
fn action_script(query: &Query, action: &ElementAction) -> HotelResult<String> {
    let body = match action {
        ElementAction::Click => {
            "el.scrollIntoView({block: 'center'}); el.click(); return null;".to_string()
        }
        ElementAction::Fill(value) => format!(
            "const value = {};\n\
             el.focus();\n\
             const proto = el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;\n\
             const setter = Object.getOwnPropertyDescriptor(proto, 'value');\n\
             if (!setter || !setter.set) return 'element has no value';\n\
             setter.set.call(el, value);\n\
             el.dispatchEvent(new Event('input', {{bubbles: true}}));\n\
             el.dispatchEvent(new Event('change', {{bubbles: true}}));\n\
             return null;",
            serde_json::to_string(value)?
        ),
        ElementAction::Check | ElementAction::Uncheck => format!(
            "if (!('checked' in el)) return 'element is not a checkbox';\n\
             if (el.checked !== {}) el.click();\n\
             return null;",
            matches!(action, ElementAction::Check)
        ),
        ElementAction::SelectOption(value) => format!(
            "const wanted = {};\n\
             if (!(el instanceof HTMLSelectElement)) return 'element is not a select';\n\
             const option = [...el.options].find(o => o.value === wanted || o.label === wanted);\n\
             if (!option) return `no option ${{wanted}}`;\n\
             const setter = Object.getOwnPropertyDescriptor(HTMLSelectElement.prototype, 'value');\n\
             setter.set.call(el, option.value);\n\
             el.dispatchEvent(new Event('input', {{bubbles: true}}));\n\
             el.dispatchEvent(new Event('change', {{bubbles: true}}));\n\
             return null;",
            serde_json::to_string(value)?
        ),
        ElementAction::ScrollIntoView => {
            "el.scrollIntoView({block: 'center'}); return null;".to_string()
        }
    };
    query_script(
        query,
        &format!(
            "if (els.length !== 1) return `expected one element, found ${{els.length}}`;\nconst el = els[0];\n{body}"
        ),
    )
}

#[derive(Debug)]
struct Installed {
    filter: RequestFilter,
    captured: Vec<CapturedRequest>,
}

type Observers = Arc<StdMutex<HashMap<ObserverId, Installed>>>;

/// Request as observers see it. Methods outside [`HttpMethod`] are skipped.
fn capture_from(
    url: &str,
    method: &str,
    headers: &serde_json::Value,
    body: Option<&str>,
) -> Option<CapturedRequest> {
    let method = HttpMethod::parse(method)?;
    let mut captured = CapturedRequest::new(url, method);
    if let Some(headers) = headers.as_object() {
        captured.headers = headers
            .iter()
            .map(|(name, value)| {
                let value = value
                    .as_str()
                    .map_or_else(|| value.to_string(), str::to_string);
                (name.clone(), value)
            })
            .collect();
    }
    captured.body = body.map(str::to_string);
    Some(captured)
}

/// Hand `request` to every observer whose filter accepts it
fn deliver(observers: &StdMutex<HashMap<ObserverId, Installed>>, request: &CapturedRequest) {
    let mut observers = observers.lock().unwrap_or_else(PoisonError::into_inner);
    for installed in observers.values_mut() {
        if installed.filter.matches(request) {
            installed.captured.push(request.clone());
        }
    }
}

/// One Chromium tab with the browser process that owns it
pub struct ChromiumDriver {
    browser: Mutex<CdpBrowser>,
    page: CdpPage,
    handler: tokio::task::JoinHandle<()>,
    observers: Observers,
    recorder: StdMutex<Option<tokio::task::JoinHandle<()>>>,
    next_observer: AtomicU64,
    recording: AtomicBool,
    closed: AtomicBool,
}

impl fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromiumDriver")
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl ChromiumDriver {
    /// Launch a browser and open one blank tab in it
    ///
    /// # Errors
    ///
    /// Returns [`HotelError::BrowserLaunch`] if Chromium cannot be started.
    pub async fn launch(config: &DriverConfig) -> HotelResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .request_timeout(config.navigation_timeout);
        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.executable_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder
            .build()
            .map_err(|message| HotelError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| HotelError::BrowserLaunch {
                    message: e.to_string(),
                })?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| HotelError::BrowserLaunch {
                message: e.to_string(),
            })?;
        tracing::info!(headless = config.headless, "chromium tab opened");

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
            observers: Arc::new(StdMutex::new(HashMap::new())),
            recorder: StdMutex::new(None),
            next_observer: AtomicU64::new(1),
            recording: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        })
    }

    async fn eval_raw(&self, script: String) -> HotelResult<String> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| HotelError::driver(format!("evaluation failed: {e}")))?
            .into_value::<String>()
            .map_err(|e| HotelError::driver(format!("evaluation returned no JSON: {e}")))
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> HotelResult<T> {
        let json = self.eval_raw(script).await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn ready_state(&self) -> HotelResult<String> {
        self.eval("JSON.stringify(document.readyState)".to_string())
            .await
    }

    async fn resource_count(&self) -> HotelResult<u64> {
        self.eval("JSON.stringify(performance.getEntriesByType('resource').length)".to_string())
            .await
    }

    async fn wait_for_network_idle(&self, url: &str, timeout: Duration) -> HotelResult<()> {
        let idle = Duration::from_millis(NETWORK_IDLE_THRESHOLD_MS);
        let poll = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
        let deadline = Instant::now() + timeout;
        let mut last = self.resource_count().await?;
        let mut quiet_since = Instant::now();
        loop {
            sleep(poll).await;
            let count = self.resource_count().await?;
            let now = Instant::now();
            if count != last {
                last = count;
                quiet_since = now;
            } else if now.duration_since(quiet_since) >= idle {
                return Ok(());
            }
            if now >= deadline {
                return Err(HotelError::Timeout {
                    action: "reach network idle on".to_string(),
                    target: url.to_string(),
                    ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                });
            }
        }
    }

    async fn ensure_recording(&self) -> HotelResult<()> {
        if self.recording.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let started = self.start_recorder().await;
        if started.is_err() {
            self.recording.store(false, Ordering::SeqCst);
        }
        started
    }

    async fn start_recorder(&self) -> HotelResult<()> {
        self.page
            .execute(EnableParams::default())
            .await
            .map_err(|e| HotelError::driver(format!("enabling network events failed: {e}")))?;
        let mut events = self
            .page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(|e| HotelError::driver(format!("subscribing to requests failed: {e}")))?;
        let observers = Arc::clone(&self.observers);
        let task = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let request = &event.request;
                if let Some(captured) = capture_from(
                    &request.url,
                    &request.method,
                    request.headers.inner(),
                    request.post_data.as_deref(),
                ) {
                    tracing::trace!(url = %captured.url, method = %captured.method, "request seen");
                    deliver(&observers, &captured);
                }
            }
        });
        *self.recorder.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);
        Ok(())
    }

    fn stop_tasks(&self) {
        self.handler.abort();
        if let Some(task) = self
            .recorder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        self.stop_tasks();
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn goto(&self, url: &str, state: LoadState, timeout: Duration) -> HotelResult<()> {
        let navigation = self.page.goto(url);
        tokio::time::timeout(timeout, navigation)
            .await
            .map_err(|_| HotelError::Timeout {
                action: "navigate to".to_string(),
                target: url.to_string(),
                ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            })?
            .map_err(|e| HotelError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let accepted = state.ready_states();
        wait_until(
            "reach load state on",
            url,
            timeout,
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            || async {
                let ready = self.ready_state().await?;
                Ok(accepted.iter().any(|s| *s == ready))
            },
        )
        .await?;
        if state == LoadState::NetworkIdle {
            self.wait_for_network_idle(url, timeout).await?;
        }
        tracing::debug!(url, state = %state, "navigated");
        Ok(())
    }

    async fn current_url(&self) -> HotelResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| HotelError::driver(format!("reading URL failed: {e}")))?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn count(&self, query: &Query) -> HotelResult<usize> {
        self.eval(query_script(query, "return els.length;")?).await
    }

    async fn text_content(&self, query: &Query) -> HotelResult<Option<String>> {
        self.eval(query_script(
            query,
            "return els.length ? (els[0].textContent || '') : null;",
        )?)
        .await
    }

    async fn all_text_contents(&self, query: &Query) -> HotelResult<Vec<String>> {
        self.eval(query_script(query, "return els.map(e => e.textContent || '');")?)
            .await
    }

    async fn attribute(&self, query: &Query, name: &str) -> HotelResult<Option<String>> {
        let name = serde_json::to_string(name)?;
        self.eval(query_script(
            query,
            &format!("return els.length ? els[0].getAttribute({name}) : null;"),
        )?)
        .await
    }

    async fn is_visible(&self, query: &Query) -> HotelResult<bool> {
        self.eval(query_script(query, "return els.length > 0 && visible(els[0]);")?)
            .await
    }

    async fn perform(&self, query: &Query, action: &ElementAction) -> HotelResult<()> {
        let refused: Option<String> = self.eval(action_script(query, action)?).await?;
        match refused {
            None => {
                tracing::trace!(selector = %query, action = action.verb(), "performed");
                Ok(())
            }
            Some(reason) => Err(HotelError::driver(format!(
                "cannot {} `{query}`: {reason}",
                action.verb()
            ))),
        }
    }

    async fn observe_requests(&self, filter: &RequestFilter) -> HotelResult<ObserverId> {
        self.ensure_recording().await?;
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::SeqCst));
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Installed {
                    filter: filter.clone(),
                    captured: Vec::new(),
                },
            );
        Ok(id)
    }

    async fn captured_requests(&self, observer: ObserverId) -> HotelResult<Vec<CapturedRequest>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&observer)
            .map(|installed| installed.captured.clone())
            .ok_or_else(|| HotelError::driver(format!("unknown observer {}", observer.0)))
    }

    async fn close(&self) -> HotelResult<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Err(e) = self.page.clone().close().await {
            tracing::debug!(error = %e, "closing page failed");
        }
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await;
        self.stop_tasks();
        closed.map_err(|e| HotelError::driver(format!("closing browser failed: {e}")))?;
        tracing::info!("chromium tab closed");
        Ok(())
    }
}

/// Opens every tab in a freshly launched Chromium
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    overrides: Option<DriverConfig>,
}

impl ChromiumLauncher {
    /// Launcher following the suite configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Launcher with explicit browser settings
    #[must_use]
    pub const fn with_config(config: DriverConfig) -> Self {
        Self {
            overrides: Some(config),
        }
    }
}

#[async_trait]
impl TabFactory for ChromiumLauncher {
    async fn open_tab(&self, config: Arc<SuiteConfig>) -> HotelResult<Tab> {
        let driver_config = self
            .overrides
            .clone()
            .unwrap_or_else(|| DriverConfig::from_suite(&config));
        let driver = ChromiumDriver::launch(&driver_config).await?;
        Ok(Tab::new(Arc::new(driver), config))
    }
}
