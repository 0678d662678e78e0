//! Request observation.
//!
//! A [`RequestObserver`] is installed on a tab before the action that fires
//! the request, then read back afterwards. Matching uses [`UrlPattern`] plus
//! an optional [`HttpMethod`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::driver::PageDriver;
use crate::result::{HotelError, HotelResult};
use crate::wait::{wait_for_value, DEFAULT_POLL_INTERVAL_MS};

/// HTTP methods for request matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET request
    Get,
    /// POST request
    Post,
    /// PUT request
    Put,
    /// DELETE request
    Delete,
    /// PATCH request
    Patch,
}

impl HttpMethod {
    /// Parse from string, case-insensitive
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            _ => None,
        }
    }

    /// Convert to string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pattern for matching request URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Prefix match
    Prefix(String),
    /// Contains substring
    Contains(String),
    /// Regex match
    Regex(String),
    /// Glob pattern (e.g., "**/room")
    Glob(String),
    /// Match any URL
    Any,
}

impl UrlPattern {
    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Prefix(pattern) => url.starts_with(pattern.as_str()),
            Self::Contains(pattern) => url.contains(pattern.as_str()),
            Self::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(url))
                .unwrap_or(false),
            Self::Glob(pattern) => Self::glob_matches(pattern, url),
            Self::Any => true,
        }
    }

    /// Glob matching where `*` spans any run of characters.
    ///
    /// The query string is ignored so `**/room` matches `/api/room?x=1`.
    fn glob_matches(pattern: &str, url: &str) -> bool {
        let url = url.split_once('?').map_or(url, |(path, _)| path);
        let parts: Vec<&str> = pattern.split('*').collect();
        let last = parts.len() - 1;
        let mut pos = 0;
        for (i, part) in parts.iter().enumerate() {
            if part.is_empty() {
                continue;
            }
            if i == 0 {
                if !url.starts_with(part) {
                    return false;
                }
                pos = part.len();
            } else if i == last {
                return url.len() >= pos + part.len() && url.ends_with(part);
            } else if let Some(found) = url[pos..].find(part) {
                pos += found + part.len();
            } else {
                return false;
            }
        }
        pattern.ends_with('*') || pos == url.len()
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(p) | Self::Prefix(p) | Self::Contains(p) | Self::Regex(p) | Self::Glob(p) => {
                f.write_str(p)
            }
            Self::Any => f.write_str("*"),
        }
    }
}

/// What an observer should capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFilter {
    /// URL pattern
    pub pattern: UrlPattern,
    /// Method, `None` for any
    pub method: Option<HttpMethod>,
}

impl RequestFilter {
    /// Filter on pattern only
    #[must_use]
    pub const fn new(pattern: UrlPattern) -> Self {
        Self {
            pattern,
            method: None,
        }
    }

    /// Restrict to one method
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Check a request against the filter
    #[must_use]
    pub fn matches(&self, request: &CapturedRequest) -> bool {
        self.method.map_or(true, |m| m == request.method) && self.pattern.matches(&request.url)
    }
}

impl fmt::Display for RequestFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method {
            Some(method) => write!(f, "{method} {}", self.pattern),
            None => write!(f, "{}", self.pattern),
        }
    }
}

/// A captured network request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedRequest {
    /// Request URL
    pub url: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Request headers
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Request body
    #[serde(default)]
    pub body: Option<String>,
}

impl CapturedRequest {
    /// Create a new captured request
    #[must_use]
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Parse body as JSON
    ///
    /// # Errors
    ///
    /// Fails when there is no body or it is not valid JSON for `T`.
    pub fn body_json<T: for<'de> Deserialize<'de>>(&self) -> HotelResult<T> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| HotelError::assertion("request body", "present", "absent"))?;
        Ok(serde_json::from_str(body)?)
    }
}

/// Handle of an installed observer, unique per driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

/// Records requests matching a filter from the moment it is installed
#[derive(Clone)]
pub struct RequestObserver {
    driver: Arc<dyn PageDriver>,
    id: ObserverId,
    filter: RequestFilter,
}

impl fmt::Debug for RequestObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestObserver")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .finish()
    }
}

impl RequestObserver {
    /// Install an observer on a driver
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub async fn install(driver: Arc<dyn PageDriver>, filter: RequestFilter) -> HotelResult<Self> {
        let id = driver.observe_requests(&filter).await?;
        tracing::debug!(filter = %filter, observer = id.0, "observing requests");
        Ok(Self { driver, id, filter })
    }

    /// The filter in use
    #[must_use]
    pub const fn filter(&self) -> &RequestFilter {
        &self.filter
    }

    /// Requests captured so far, oldest first
    ///
    /// # Errors
    ///
    /// Propagates driver failures.
    pub async fn captured(&self) -> HotelResult<Vec<CapturedRequest>> {
        self.driver.captured_requests(self.id).await
    }

    /// Wait for exactly one matching request
    ///
    /// # Errors
    ///
    /// Times out when nothing arrives, fails an assertion when several did.
    pub async fn single(&self, timeout: Duration) -> HotelResult<CapturedRequest> {
        let target = self.filter.to_string();
        let mut captured = wait_for_value(
            "capture",
            &target,
            timeout,
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            || async {
                let seen = self.captured().await?;
                Ok::<_, HotelError>((!seen.is_empty()).then_some(seen))
            },
        )
        .await?;
        if captured.len() != 1 {
            return Err(HotelError::assertion(
                format!("requests matching {target}"),
                1,
                captured.len(),
            ));
        }
        captured.pop().ok_or_else(|| HotelError::driver("capture vanished"))
    }
}
