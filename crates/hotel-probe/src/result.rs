//! Result and error types for hotel-probe.

use serde::Serialize;
use thiserror::Error;

/// Result type for hotel-probe operations
pub type HotelResult<T> = Result<T, HotelError>;

/// Coarse classification of a failure, used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Expected state was not observed
    Assertion,
    /// A page-facing action never became ready
    Timeout,
    /// Unknown registry key: a defect in the test code
    Lookup,
    /// Non-2xx status or malformed payload from the backend
    Backend,
    /// Browser, configuration or transport problem
    Infrastructure,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Assertion => "assertion",
            Self::Timeout => "timeout",
            Self::Lookup => "lookup",
            Self::Backend => "backend",
            Self::Infrastructure => "infrastructure",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while driving the hotel booking suite
#[derive(Debug, Error)]
pub enum HotelError {
    /// Assertion failed
    #[error("Assertion failed: {what}\n  expected: {expected}\n    actual: {actual}")]
    AssertionFailed {
        /// What was being checked
        what: String,
        /// Expected value (debug formatted)
        expected: String,
        /// Observed value (debug formatted)
        actual: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting to {action} `{target}`")]
    Timeout {
        /// Action that was waiting
        action: String,
        /// Selector, URL or condition being awaited
        target: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// An action resolved to more than one element
    #[error("Strict mode violation: `{target}` resolved to {count} elements")]
    StrictMode {
        /// Query description
        target: String,
        /// Number of matches
        count: usize,
    },

    /// Unknown selector or feature key
    #[error("Unknown {kind} key `{key}`")]
    UnknownKey {
        /// Registry that was consulted
        kind: &'static str,
        /// Key that was requested
        key: String,
    },

    /// Backend returned a non-success status
    #[error("{method} {url} returned {status}: {body}")]
    Api {
        /// HTTP method
        method: String,
        /// Request URL
        url: String,
        /// Status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Backend payload was malformed or flagged unsuccessful
    #[error("Unexpected payload from {url}: {message}")]
    ApiPayload {
        /// Request URL
        url: String,
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Automation engine error
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Fixture error (setup/teardown failed)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// A named workflow step failed
    #[error("Step `{step}` failed: {source}")]
    StepFailed {
        /// Step name
        step: String,
        /// Underlying failure
        #[source]
        source: Box<HotelError>,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// URL error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl HotelError {
    /// Create an assertion failure from expected and actual values
    pub fn assertion(
        what: impl Into<String>,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        Self::AssertionFailed {
            what: what.into(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }

    /// Create a driver error
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify the failure
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::AssertionFailed { .. } => FailureKind::Assertion,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::UnknownKey { .. } => FailureKind::Lookup,
            Self::Api { .. } | Self::ApiPayload { .. } => FailureKind::Backend,
            Self::StepFailed { source, .. } => source.kind(),
            Self::StrictMode { .. }
            | Self::Navigation { .. }
            | Self::Driver { .. }
            | Self::BrowserLaunch { .. }
            | Self::Config { .. }
            | Self::Fixture { .. }
            | Self::Http(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_)
            | Self::Url(_) => FailureKind::Infrastructure,
        }
    }

    /// Innermost error, skipping step wrappers
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::StepFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Names of the workflow steps the error passed through, outermost first
    #[must_use]
    pub fn step_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::StepFailed { step, source } = current {
            path.push(step.as_str());
            current = source;
        }
        path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_assertion_message_shows_both_sides() {
        let err = HotelError::assertion("room price", 888, 900);
        let text = err.to_string();
        assert!(text.contains("room price"));
        assert!(text.contains("888"));
        assert!(text.contains("900"));
        assert_eq!(err.kind(), FailureKind::Assertion);
    }

    #[test]
    fn test_timeout_names_target() {
        let err = HotelError::Timeout {
            action: "click".to_string(),
            target: "#createRoom".to_string(),
            ms: 5000,
        };
        assert!(err.to_string().contains("#createRoom"));
        assert!(err.to_string().contains("5000ms"));
        assert_eq!(err.kind(), FailureKind::Timeout);
    }

    #[test]
    fn test_step_wrapping_keeps_kind_and_path() {
        let inner = HotelError::UnknownKey {
            kind: "feature",
            key: "Jacuzzi".to_string(),
        };
        let err = HotelError::StepFailed {
            step: "create room".to_string(),
            source: Box::new(HotelError::StepFailed {
                step: "tick features".to_string(),
                source: Box::new(inner),
            }),
        };
        assert_eq!(err.kind(), FailureKind::Lookup);
        assert_eq!(err.step_path(), vec!["create room", "tick features"]);
        assert!(matches!(err.root(), HotelError::UnknownKey { .. }));
    }

    #[test]
    fn test_api_error_is_backend() {
        let err = HotelError::Api {
            method: "POST".to_string(),
            url: "http://localhost/api/room".to_string(),
            status: 400,
            body: "{}".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::Backend);
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: HotelError = io_err.into();
        assert_eq!(err.kind(), FailureKind::Infrastructure);
    }
}
