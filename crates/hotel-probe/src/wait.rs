//! Wait mechanisms shared by locators, navigation and request observers.
//!
//! Every wait is a poll loop with an explicit budget. Nothing in the crate
//! sleeps for a fixed duration and hopes for the best.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::result::{HotelError, HotelResult};

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default navigation timeout (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Network idle threshold (500ms without new resource entries)
pub const NETWORK_IDLE_THRESHOLD_MS: u64 = 500;

/// Page load states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoadState {
    /// Wait for the `load` event to fire
    Load,
    /// Wait for `DOMContentLoaded` event
    #[default]
    DomContentLoaded,
    /// Wait for `load`, then for no new requests during the idle threshold
    NetworkIdle,
}

impl LoadState {
    /// Get the JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::NetworkIdle => "networkidle",
        }
    }

    /// `document.readyState` values that satisfy this state
    #[must_use]
    pub const fn ready_states(&self) -> &'static [&'static str] {
        match self {
            Self::Load | Self::NetworkIdle => &["complete"],
            Self::DomContentLoaded => &["interactive", "complete"],
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

/// Poll `check` until it reports `true` or the budget runs out.
///
/// Errors from `check` end the wait immediately. It is always
/// consulted at least once, so a zero budget still sees the current state.
///
/// # Errors
///
/// Returns [`HotelError::Timeout`] naming `action` and `target` when the
/// budget is spent, or the error `check` returned.
pub async fn wait_until<F, Fut>(
    action: &str,
    target: &str,
    timeout: Duration,
    poll: Duration,
    mut check: F,
) -> HotelResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HotelResult<bool>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if check().await? {
            return Ok(());
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(HotelError::Timeout {
                action: action.to_string(),
                target: target.to_string(),
                ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }
        tokio::time::sleep(poll.min(deadline - now)).await;
    }
}

/// Poll `check` until it yields a value or the budget runs out.
///
/// # Errors
///
/// Same as [`wait_until`].
pub async fn wait_for_value<T, F, Fut>(
    action: &str,
    target: &str,
    timeout: Duration,
    poll: Duration,
    mut check: F,
) -> HotelResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HotelResult<Option<T>>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = check().await? {
            return Ok(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return Err(HotelError::Timeout {
                action: action.to_string(),
                target: target.to_string(),
                ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }
        tokio::time::sleep(poll.min(deadline - now)).await;
    }
}
