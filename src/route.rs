//! Outer route codec.
//!
//! Converts between the canonical [`Location`] and the outer route string:
//!
//! ```text
//! /{project}/{version}/{page}{#fragment}{?hide-ui=true}
//! ```
//!
//! Path matching is done with [`matchit`] against a fixed table:
//!
//! | Pattern                           | Yields                          |
//! |-----------------------------------|---------------------------------|
//! | `/`                               | empty project                   |
//! | `/{project}`                      | version `latest`, index page    |
//! | `/{project}/{version}`            | index page                      |
//! | `/{project}/{version}/{*page}`    | everything                      |
//!
//! The hide-ui flag is accepted both as a real query (`page.html?hide-ui=true`)
//! and trailing the fragment (`page.html#intro?hide-ui=true`), which is where
//! it ends up when a location with a fragment is serialized.
//!
//! # Example
//!
//! ```
//! use docat_navigator::{Location, RouteCodec};
//!
//! let codec = RouteCodec::new("index.html");
//! let loc = codec.parse("/awesome/1.0.0/guide/install.html#pip?hide-ui=true");
//!
//! assert_eq!(loc.project, "awesome");
//! assert_eq!(loc.page, "guide/install.html");
//! assert_eq!(loc.fragment, "#pip");
//! assert!(loc.hide_ui);
//! assert_eq!(RouteCodec::to_url(&loc), "/awesome/1.0.0/guide/install.html#pip?hide-ui=true");
//! ```

use crate::location::{Location, LATEST};
use crate::logging::docs_log;
use std::collections::HashMap;

/// Query key carrying the hide-ui flag.
pub const HIDE_UI_PARAM: &str = "hide-ui";

/// Parses and serializes outer routes.
#[derive(Clone)]
pub struct RouteCodec {
    router: matchit::Router<()>,
    index_page: String,
}

impl RouteCodec {
    /// Build the codec; `index_page` is used when the route names no page.
    pub fn new(index_page: impl Into<String>) -> Self {
        let mut router = matchit::Router::new();
        for pattern in [
            "/",
            "/{project}",
            "/{project}/{version}",
            "/{project}/{version}/{*page}",
        ] {
            router
                .insert(pattern, ())
                .expect("static route table is conflict-free");
        }
        Self {
            router,
            index_page: index_page.into(),
        }
    }

    /// Serialize a location into an outer route.
    pub fn to_url(location: &Location) -> String {
        let mut url = format!(
            "/{}/{}/{}{}",
            location.project, location.version, location.page, location.fragment
        );
        if location.hide_ui {
            url.push('?');
            url.push_str(HIDE_UI_PARAM);
            url.push_str("=true");
        }
        url
    }

    /// Parse an outer route (`path`, optional `?query`, optional `#hash`).
    ///
    /// Unmatchable paths produce a location with an empty project, which the
    /// page reports as [`DocsError::MissingProject`](crate::DocsError::MissingProject).
    pub fn parse(&self, url: &str) -> Location {
        let (before_hash, hash) = match url.split_once('#') {
            Some((before, hash)) => (before, Some(hash)),
            None => (url, None),
        };
        let (path, query) = before_hash.split_once('?').unwrap_or((before_hash, ""));

        let (fragment, hash_query) = match hash {
            Some(hash) => {
                let (fragment, hash_query) = hash.split_once('?').unwrap_or((hash, ""));
                let fragment = if fragment.is_empty() {
                    String::new()
                } else {
                    format!("#{fragment}")
                };
                (fragment, hash_query)
            }
            None => (String::new(), ""),
        };

        let hide_ui = QueryParams::from_query_string(query).is_true(HIDE_UI_PARAM)
            || QueryParams::from_query_string(hash_query).is_true(HIDE_UI_PARAM);

        let (project, version, page) = self.match_path(path);

        Location {
            project,
            version: version.unwrap_or_else(|| LATEST.to_string()),
            page: page
                .filter(|page| !page.is_empty())
                .unwrap_or_else(|| self.index_page.clone()),
            fragment,
            hide_ui,
        }
    }

    fn match_path(&self, path: &str) -> (String, Option<String>, Option<String>) {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let matched = self.router.at(&path).ok().or_else(|| {
            // "/p/" and "/p/1.0/" only match once the trailing slash is gone
            let trimmed = path.trim_end_matches('/');
            if trimmed.is_empty() || trimmed.len() == path.len() {
                None
            } else {
                self.router.at(trimmed).ok()
            }
        });

        match matched {
            Some(m) => (
                m.params.get("project").unwrap_or_default().to_string(),
                m.params.get("version").map(str::to_string),
                m.params.get("page").map(str::to_string),
            ),
            None => {
                docs_log!(debug, "Route '{}' matched no docs pattern", path);
                (String::new(), None, None)
            }
        }
    }
}

impl std::fmt::Debug for RouteCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCodec")
            .field("index_page", &self.index_page)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters parsed from a `key=value&...` string.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: HashMap<String, Vec<String>>,
}

impl QueryParams {
    /// Parse from query string (without the leading `?`).
    pub fn from_query_string(query: &str) -> Self {
        let mut params: HashMap<String, Vec<String>> = HashMap::new();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params
                .entry(decode_uri_component(key))
                .or_default()
                .push(decode_uri_component(value));
        }

        Self { params }
    }

    /// Get the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key)?.first().map(String::as_str)
    }

    /// Whether the first value for `key` is literally `true`.
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Percent-decoding of a query component; `+` becomes a space.
fn decode_uri_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}
