//! Canonical location store.
//!
//! [`Location`] is the single (project, version, page, fragment, hide-ui)
//! tuple that drives rendering. [`LocationStore`] owns it and exposes one
//! mutation, [`LocationStore::update`], which refuses identical candidates.
//! That refusal is what stops the route → embedded content → route loop.

use crate::logging::docs_log;
use std::fmt;

/// Version token meaning "the newest version in the catalog".
pub const LATEST: &str = "latest";

/// How a location change is recorded in navigation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryMode {
    /// Add a new history entry
    Push,
    /// Overwrite the current history entry
    Replace,
    /// Leave history untouched
    Skip,
}

/// The canonical docs location.
///
/// `fragment` is empty or a `#` followed by at least one character; a bare
/// `#` is stored as empty. `version` is [`LATEST`], a concrete version name
/// or a tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub project: String,
    pub version: String,
    pub page: String,
    pub fragment: String,
    pub hide_ui: bool,
}

impl Location {
    /// Create a location without fragment and with the UI shown.
    pub fn new(
        project: impl Into<String>,
        version: impl Into<String>,
        page: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            version: version.into(),
            page: page.into(),
            fragment: String::new(),
            hide_ui: false,
        }
    }

    /// Set the fragment, adding the leading `#` when missing.
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        self.fragment = if fragment.is_empty() || fragment.starts_with('#') {
            fragment
        } else {
            format!("#{fragment}")
        };
        self.normalized()
    }

    /// The same location with a bare `#` fragment dropped.
    fn normalized(mut self) -> Self {
        if self.fragment == "#" {
            self.fragment.clear();
        }
        self
    }

    /// Set the hide-ui flag.
    pub fn with_hide_ui(mut self, hide_ui: bool) -> Self {
        self.hide_ui = hide_ui;
        self
    }

    /// Copy of this location pointing at another version.
    pub fn at_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self.clone()
        }
    }

    /// Whether the version token still needs resolving against a catalog.
    pub fn is_latest(&self) -> bool {
        self.version == LATEST
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}/{}/{}{}",
            self.project, self.version, self.page, self.fragment
        )?;
        if self.hide_ui {
            write!(f, " (ui hidden)")?;
        }
        Ok(())
    }
}

/// An accepted location change, handed to the URL synchronizer.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationChange {
    pub from: Location,
    pub to: Location,
    pub mode: HistoryMode,
}

impl LocationChange {
    /// Whether project or version differ, i.e. the embedded content must reload.
    pub fn changes_content(&self) -> bool {
        self.from.project != self.to.project || self.from.version != self.to.version
    }
}

/// Owner of the canonical [`Location`].
#[derive(Debug, Clone, Default)]
pub struct LocationStore {
    current: Location,
    revision: u64,
}

impl LocationStore {
    /// Create a store holding the empty location.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current location.
    pub fn current(&self) -> &Location {
        &self.current
    }

    /// Number of accepted updates so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the location with `candidate` unless the two are identical.
    ///
    /// Returns the accepted change, or `None` for a no-op.
    pub fn update(&mut self, candidate: Location, mode: HistoryMode) -> Option<LocationChange> {
        let candidate = candidate.normalized();
        if candidate == self.current {
            docs_log!(trace, "Location unchanged ({}), ignoring {:?} update", candidate, mode);
            return None;
        }

        let from = std::mem::replace(&mut self.current, candidate);
        self.revision += 1;
        docs_log!(info, "Location {:?}: '{}' → '{}'", mode, from, self.current);

        Some(LocationChange {
            from,
            to: self.current.clone(),
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_starts_empty() {
        let store = LocationStore::new();
        assert_eq!(store.current(), &Location::default());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_update_accepts_change() {
        let mut store = LocationStore::new();
        let loc = Location::new("awesome", "1.0.0", "index.html");

        let change = store.update(loc.clone(), HistoryMode::Push).unwrap();
        assert_eq!(change.from, Location::default());
        assert_eq!(change.to, loc);
        assert_eq!(change.mode, HistoryMode::Push);
        assert_eq!(store.current(), &loc);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut store = LocationStore::new();
        let loc = Location::new("awesome", "1.0.0", "index.html").with_fragment("intro");

        assert!(store.update(loc.clone(), HistoryMode::Replace).is_some());
        for mode in [HistoryMode::Push, HistoryMode::Replace, HistoryMode::Skip] {
            assert!(store.update(loc.clone(), mode).is_none());
        }
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_hide_ui_alone_is_a_change() {
        let mut store = LocationStore::new();
        let loc = Location::new("awesome", "1.0.0", "index.html");
        store.update(loc.clone(), HistoryMode::Replace);

        let change = store
            .update(loc.with_hide_ui(true), HistoryMode::Push)
            .unwrap();
        assert!(!change.changes_content());
        assert!(store.current().hide_ui);
    }

    #[test]
    fn test_changes_content_on_version() {
        let mut store = LocationStore::new();
        let loc = Location::new("awesome", "1.0.0", "index.html");
        store.update(loc.clone(), HistoryMode::Replace);

        let change = store.update(loc.at_version("2.0.0"), HistoryMode::Push).unwrap();
        assert!(change.changes_content());
    }

    #[test]
    fn test_with_fragment_adds_delimiter() {
        let loc = Location::new("p", "1", "a.html").with_fragment("section");
        assert_eq!(loc.fragment, "#section");
        let loc = Location::new("p", "1", "a.html").with_fragment("#section");
        assert_eq!(loc.fragment, "#section");
    }

    #[test]
    fn test_bare_hash_fragment_is_empty() {
        let loc = Location::new("p", "1", "a.html").with_fragment("#");
        assert_eq!(loc.fragment, "");

        let mut store = LocationStore::new();
        let raw = Location {
            fragment: "#".into(),
            ..Location::new("p", "1", "a.html")
        };
        let change = store.update(raw, HistoryMode::Push).unwrap();
        assert_eq!(change.to.fragment, "");
        assert_eq!(store.current().fragment, "");
        assert!(store
            .update(Location::new("p", "1", "a.html"), HistoryMode::Push)
            .is_none());
    }
}
