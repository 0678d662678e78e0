//! Suite configuration.
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional YAML file
//! 3. a `.env` file in the working directory
//! 4. process environment variables
//!
//! The `.env` file is read without touching the process environment, so
//! parallel tests can load configurations side by side.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::result::{HotelError, HotelResult};

/// Default client site
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default REST collection path for rooms
pub const DEFAULT_ROOMS_PATH: &str = "room-collection";

/// How the admin edit page addresses a room
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAddressing {
    /// By the backend room id
    #[default]
    Id,
    /// By the row position in the admin listing
    Index,
}

impl std::str::FromStr for EditAddressing {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "index" => Ok(Self::Index),
            other => Err(HotelError::config(format!(
                "EDIT_ADDRESSING must be `id` or `index`, got `{other}`"
            ))),
        }
    }
}

/// Configuration shared read-only by every scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Client site root
    pub base_url: String,
    /// Admin site root, derived from `base_url` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,
    /// REST API root, derived from `base_url` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Room collection path under the API root
    pub rooms_path: String,
    /// Maximum scenarios in flight
    pub workers: usize,
    /// Run browsers headless
    pub headless: bool,
    /// Admin login name
    pub admin_username: String,
    /// Admin password
    pub admin_password: String,
    /// Budget for a single element action
    pub action_timeout_ms: u64,
    /// Budget for a navigation
    pub navigation_timeout_ms: u64,
    /// Chromium executable override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chromium_path: Option<String>,
    /// Launch Chromium with `--no-sandbox`
    pub no_sandbox: bool,
    /// Edit page addressing
    pub edit_addressing: EditAddressing,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            admin_url: None,
            api_url: None,
            rooms_path: DEFAULT_ROOMS_PATH.to_string(),
            workers: 1,
            headless: false,
            admin_username: String::new(),
            admin_password: String::new(),
            action_timeout_ms: 5_000,
            navigation_timeout_ms: 30_000,
            chromium_path: None,
            no_sandbox: false,
            edit_addressing: EditAddressing::Id,
        }
    }
}

/// Flags are on only for the literal `true`
fn flag(value: &str) -> bool {
    value == "true"
}

fn number<T: std::str::FromStr>(key: &str, value: &str) -> HotelResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| HotelError::config(format!("{key} must be a number, got `{value}`")))
}

fn join(root: &str, segment: &str) -> String {
    format!(
        "{}/{}",
        root.trim_end_matches('/'),
        segment.trim_start_matches('/')
    )
}

impl SuiteConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from YAML text
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or unknown keys.
    pub fn from_yaml_str(yaml: &str) -> HotelResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> HotelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            HotelError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Load with the standard layering from the working directory
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed values or invalid URLs.
    pub fn load(file: Option<&Path>) -> HotelResult<Self> {
        Self::load_with(file, Path::new(".env"), |key| std::env::var(key).ok())
    }

    /// Load with explicit `.env` location and environment lookup
    ///
    /// # Errors
    ///
    /// Same as [`SuiteConfig::load`].
    pub fn load_with(
        file: Option<&Path>,
        dotenv: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> HotelResult<Self> {
        let base = match file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        let dotenv = read_dotenv(dotenv)?;
        let config = base.apply_env(|key| env(key).or_else(|| dotenv.get(key).cloned()))?;
        config.validate()?;
        tracing::debug!(config = ?config.redacted(), "configuration loaded");
        Ok(config)
    }

    /// Overlay environment values
    ///
    /// # Errors
    ///
    /// Fails on unparsable numbers or addressing modes.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> HotelResult<Self> {
        if let Some(v) = lookup("BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("ADMIN_URL") {
            self.admin_url = Some(v);
        }
        if let Some(v) = lookup("API_URL") {
            self.api_url = Some(v);
        }
        if let Some(v) = lookup("ROOMS_PATH") {
            self.rooms_path = v;
        }
        if let Some(v) = lookup("WORKERS") {
            self.workers = number("WORKERS", &v)?;
        }
        if let Some(v) = lookup("HEADLESS") {
            self.headless = flag(&v);
        }
        if let Some(v) = lookup("ADMIN_USERNAME") {
            self.admin_username = v;
        }
        if let Some(v) = lookup("ADMIN_PASSWORD") {
            self.admin_password = v;
        }
        if let Some(v) = lookup("ACTION_TIMEOUT_MS") {
            self.action_timeout_ms = number("ACTION_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("NAVIGATION_TIMEOUT_MS") {
            self.navigation_timeout_ms = number("NAVIGATION_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("CHROMIUM_PATH") {
            self.chromium_path = Some(v);
        }
        if let Some(v) = lookup("NO_SANDBOX") {
            self.no_sandbox = flag(&v);
        }
        if let Some(v) = lookup("EDIT_ADDRESSING") {
            self.edit_addressing = v.parse()?;
        }
        Ok(self)
    }

    /// Check URLs and limits
    ///
    /// # Errors
    ///
    /// Fails on unparsable URLs or zero workers.
    pub fn validate(&self) -> HotelResult<()> {
        if self.workers == 0 {
            return Err(HotelError::config("workers must be at least 1"));
        }
        for (name, value) in [
            ("base_url", self.base_url.clone()),
            ("admin_url", self.admin_url()),
            ("api_url", self.api_url()),
        ] {
            Url::parse(&value)
                .map_err(|e| HotelError::config(format!("{name} `{value}` is not a URL: {e}")))?;
        }
        Ok(())
    }

    /// Admin site root
    #[must_use]
    pub fn admin_url(&self) -> String {
        self.admin_url
            .clone()
            .unwrap_or_else(|| join(&self.base_url, "admin"))
    }

    /// REST API root
    #[must_use]
    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| join(&self.base_url, "api"))
    }

    /// Full URL of the room collection
    ///
    /// # Errors
    ///
    /// Fails when the API root is not a URL.
    pub fn rooms_endpoint(&self) -> HotelResult<Url> {
        Ok(Url::parse(&join(&self.api_url(), &self.rooms_path))?)
    }

    /// Budget for one element action
    #[must_use]
    pub const fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    /// Budget for one navigation
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Resolved view safe to print
    #[must_use]
    pub fn redacted(&self) -> ConfigView {
        ConfigView {
            base_url: self.base_url.clone(),
            admin_url: self.admin_url(),
            api_url: self.api_url(),
            rooms_path: self.rooms_path.clone(),
            workers: self.workers,
            headless: self.headless,
            admin_username: self.admin_username.clone(),
            admin_password: if self.admin_password.is_empty() {
                String::new()
            } else {
                "********".to_string()
            },
            action_timeout_ms: self.action_timeout_ms,
            navigation_timeout_ms: self.navigation_timeout_ms,
            chromium_path: self.chromium_path.clone(),
            no_sandbox: self.no_sandbox,
            edit_addressing: self.edit_addressing,
        }
    }

    /// Set the client site root
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API root
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the room collection path
    #[must_use]
    pub fn with_rooms_path(mut self, path: impl Into<String>) -> Self {
        self.rooms_path = path.into();
        self
    }

    /// Set worker count
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set admin credentials
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.admin_username = username.into();
        self.admin_password = password.into();
        self
    }

    /// Set the action budget
    #[must_use]
    pub const fn with_action_timeout_ms(mut self, ms: u64) -> Self {
        self.action_timeout_ms = ms;
        self
    }

    /// Set the Chromium executable
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set edit page addressing
    #[must_use]
    pub const fn with_edit_addressing(mut self, addressing: EditAddressing) -> Self {
        self.edit_addressing = addressing;
        self
    }
}

/// Fully resolved configuration with the password masked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigView {
    /// Client site root
    pub base_url: String,
    /// Admin site root
    pub admin_url: String,
    /// REST API root
    pub api_url: String,
    /// Room collection path
    pub rooms_path: String,
    /// Maximum scenarios in flight
    pub workers: usize,
    /// Headless browsers
    pub headless: bool,
    /// Admin login name
    pub admin_username: String,
    /// Masked password
    pub admin_password: String,
    /// Action budget
    pub action_timeout_ms: u64,
    /// Navigation budget
    pub navigation_timeout_ms: u64,
    /// Chromium executable
    pub chromium_path: Option<String>,
    /// Sandbox disabled
    pub no_sandbox: bool,
    /// Edit page addressing
    pub edit_addressing: EditAddressing,
}

fn read_dotenv(path: &Path) -> HotelResult<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    dotenvy::from_path_iter(path)
        .map_err(|e| HotelError::config(format!("cannot read {}: {e}", path.display())))?
        .map(|item| {
            item.map_err(|e| HotelError::config(format!("bad line in {}: {e}", path.display())))
        })
        .collect()
}
