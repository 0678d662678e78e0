//! Page objects.
//!
//! A page object wraps one route: it knows how to reach it through the
//! [`Navigator`](crate::navigation::Navigator) of its site, composes the
//! components living on it and offers workflows that sequence them. Each page
//! records the full path pattern it answers to so callers can wait for it.

mod admin_rooms;
mod edit_room;
mod home;
mod login;
mod reservation;

pub use admin_rooms::AdminRoomsPage;
pub use edit_room::AdminEditRoomPage;
pub use home::HomePage;
pub use login::AdminLoginPage;
pub use reservation::ReservationPage;

use regex::Regex;
use std::collections::HashMap;
use url::Url;

use crate::navigation::Navigator;
use crate::result::{HotelError, HotelResult};

/// A page reachable at a path pattern such as `/admin/room/:id`
pub trait PageObject {
    /// Full path pattern, including the site's base path
    fn url_pattern(&self) -> &str;

    /// Page name for logging
    fn page_name(&self) -> &'static str;

    /// Whether `url` is this page
    fn is_current(&self, url: &str) -> bool {
        UrlMatcher::new(self.url_pattern()).matches_url(url)
    }
}

/// Path pattern matcher.
///
/// Patterns support literal segments (`/rooms`), wildcards (`/room/*`) and
/// named parameters (`/room/:id`). Each wildcard or parameter consumes
/// exactly one segment.
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

impl UrlMatcher {
    /// Parse a pattern
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();
        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// The source pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether a bare path matches
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        parts.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(&parts)
                .all(|(segment, part)| match segment {
                    UrlSegment::Literal(lit) => lit == part,
                    UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
                })
    }

    /// Whether the path of an absolute URL matches; query and fragment are ignored
    #[must_use]
    pub fn matches_url(&self, url: &str) -> bool {
        Url::parse(url).is_ok_and(|url| self.matches(url.path()))
    }

    /// Named parameters taken from a matching path
    #[must_use]
    pub fn extract_params(&self, path: &str) -> HashMap<String, String> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.segments
            .iter()
            .zip(parts)
            .filter_map(|(segment, part)| match segment {
                UrlSegment::Parameter(name) => Some((name.clone(), part.to_string())),
                UrlSegment::Literal(_) | UrlSegment::Wildcard => None,
            })
            .collect()
    }

    /// Regex finding this path anywhere in a full URL, for URL waits
    ///
    /// # Errors
    ///
    /// Fails only if the generated expression is rejected by the regex engine.
    pub fn to_regex(&self) -> HotelResult<Regex> {
        let body: String = self
            .segments
            .iter()
            .map(|segment| match segment {
                UrlSegment::Literal(lit) => format!("/{}", regex::escape(lit)),
                UrlSegment::Wildcard | UrlSegment::Parameter(_) => "/[^/?#]+".to_string(),
            })
            .collect();
        let expr = format!("^[a-z][a-z0-9+.-]*://[^/]+{body}/?(?:[?#].*)?$");
        Regex::new(&expr).map_err(|e| {
            HotelError::config(format!("route pattern `{}` is unusable: {e}", self.pattern))
        })
    }
}

/// Full path pattern of `route` under a site's base path
pub(crate) fn route_pattern(site: &dyn Navigator, route: &str) -> String {
    let base = site.base().path().trim_end_matches('/');
    let route = route.trim_start_matches('/');
    if route.is_empty() {
        if base.is_empty() {
            "/".to_string()
        } else {
            base.to_string()
        }
    } else {
        format!("{base}/{route}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod url_matcher_tests {
        use super::*;

        #[test]
        fn test_literal_and_parameter_segments() {
            let matcher = UrlMatcher::new("/admin/room/:id");
            assert!(matcher.matches("/admin/room/12"));
            assert!(!matcher.matches("/admin/room"));
            assert!(!matcher.matches("/admin/rooms/12"));
            assert_eq!(
                matcher.extract_params("/admin/room/12").get("id").map(String::as_str),
                Some("12")
            );
        }

        #[test]
        fn test_wildcard_consumes_one_segment() {
            let matcher = UrlMatcher::new("/reservation/*");
            assert!(matcher.matches("/reservation/3"));
            assert!(!matcher.matches("/reservation/3/extra"));
        }

        #[test]
        fn test_matches_url_ignores_query() {
            let matcher = UrlMatcher::new("/reservation/:id");
            assert!(matcher.matches_url("http://localhost:3000/reservation/1?checkin=2026-01-01"));
            assert!(!matcher.matches_url("not a url"));
        }

        #[test]
        fn test_regex_matches_full_urls() {
            let regex = UrlMatcher::new("/admin/rooms").to_regex().unwrap();
            assert!(regex.is_match("http://localhost:3000/admin/rooms"));
            assert!(regex.is_match("https://hotel.test/admin/rooms/"));
            assert!(!regex.is_match("http://localhost:3000/admin"));
            assert!(!regex.is_match("http://localhost:3000/admin/roomsx"));
        }

        #[test]
        fn test_regex_escapes_literals() {
            let regex = UrlMatcher::new("/a.b").to_regex().unwrap();
            assert!(regex.is_match("http://h/a.b"));
            assert!(!regex.is_match("http://h/axb"));
        }
    }
}
