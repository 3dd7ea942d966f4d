//! Version resolution.
//!
//! Turns a requested version token into a concrete version name against a
//! project's catalog:
//!
//! - `latest` → the [`latest_version`] of the catalog;
//! - a version name or a tag → the descriptor answering to it;
//! - anything else → [`DocsError::UnknownVersion`].
//!
//! Catalog fetches are asynchronous and can be overtaken by a newer project
//! selection. [`ResolutionTracker`] hands out a [`ResolutionTicket`] per
//! fetch; only the ticket issued last may apply its result.
//!
//! ```
//! use docat_navigator::{resolve_version, VersionDescriptor};
//!
//! let catalog = vec![
//!     VersionDescriptor::new("1.0.0"),
//!     VersionDescriptor::new("1.2.0").tag("stable"),
//!     VersionDescriptor::new("2.0.0"),
//! ];
//!
//! let resolved = resolve_version("awesome", catalog, "stable").unwrap();
//! assert_eq!(resolved.version, "1.2.0");
//! assert!(resolved.is_stale());
//! ```

use crate::error::DocsError;
use crate::location::LATEST;
use crate::logging::docs_log;
use crate::repository::DocsRepository;
use crate::version::{latest_version, sort_catalog, VersionDescriptor};

// ============================================================================
// Resolution
// ============================================================================

/// A version token resolved against a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Catalog, ascending by semantic version.
    pub catalog: Vec<VersionDescriptor>,
    /// Concrete version name the token resolved to.
    pub version: String,
    /// Name of the catalog's latest version.
    pub latest: String,
}

impl Resolution {
    /// Whether an outdated version is being shown.
    pub fn is_stale(&self) -> bool {
        self.version != self.latest
    }

    /// Version names in catalog order.
    pub fn version_names(&self) -> Vec<String> {
        self.catalog.iter().map(|d| d.name.clone()).collect()
    }
}

/// Resolve `token` against `catalog`, sorting the catalog first.
pub fn resolve_version(
    project: &str,
    mut catalog: Vec<VersionDescriptor>,
    token: &str,
) -> Result<Resolution, DocsError> {
    sort_catalog(&mut catalog);

    let latest = latest_version(&catalog)
        .map(|d| d.name.clone())
        .ok_or_else(|| DocsError::EmptyVersionList {
            project: project.to_string(),
        })?;

    let version = if token == LATEST {
        latest.clone()
    } else {
        match catalog.iter().find(|d| d.answers_to(token)) {
            Some(descriptor) => descriptor.name.clone(),
            None => {
                docs_log!(
                    error,
                    "Version '{}' doesn't exist for project '{}'",
                    token,
                    project
                );
                return Err(DocsError::UnknownVersion {
                    project: project.to_string(),
                    version: token.to_string(),
                });
            }
        }
    };

    docs_log!(
        debug,
        "Resolved '{}' of '{}' to '{}' (latest '{}')",
        token,
        project,
        version,
        latest
    );

    Ok(Resolution {
        catalog,
        version,
        latest,
    })
}

/// Fetch a project's catalog, sorted ascending.
///
/// An empty catalog is reported as [`DocsError::EmptyVersionList`], a
/// repository failure as [`DocsError::Resolution`].
pub async fn fetch_catalog(
    repository: &dyn DocsRepository,
    project: &str,
) -> Result<Vec<VersionDescriptor>, DocsError> {
    let mut catalog = repository
        .get_versions(project)
        .await
        .map_err(|source| {
            docs_log!(error, "Loading versions of '{}' failed: {}", project, source);
            DocsError::Resolution {
                project: project.to_string(),
                source,
            }
        })?;

    if catalog.is_empty() {
        docs_log!(error, "Project '{}' has no versions", project);
        return Err(DocsError::EmptyVersionList {
            project: project.to_string(),
        });
    }

    sort_catalog(&mut catalog);
    Ok(catalog)
}

// ============================================================================
// Tickets
// ============================================================================

/// Identifies one in-flight catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTicket {
    id: u64,
    project: String,
}

impl ResolutionTicket {
    /// Project the fetch is for.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Sequence number of the fetch.
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Issues tickets and tells which one is still relevant.
#[derive(Debug, Clone, Default)]
pub struct ResolutionTracker {
    last_id: u64,
    current: Option<ResolutionTicket>,
}

impl ResolutionTracker {
    /// Create a tracker with no fetch in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch for `project`, superseding any fetch in flight.
    pub fn start(&mut self, project: &str) -> ResolutionTicket {
        self.last_id += 1;
        let ticket = ResolutionTicket {
            id: self.last_id,
            project: project.to_string(),
        };
        if let Some(previous) = self.current.replace(ticket.clone()) {
            docs_log!(
                debug,
                "Resolution #{} for '{}' supersedes #{} for '{}'",
                ticket.id,
                ticket.project,
                previous.id,
                previous.project
            );
        }
        ticket
    }

    /// The fetch in flight, if any.
    pub fn in_flight(&self) -> Option<&ResolutionTicket> {
        self.current.as_ref()
    }

    /// Check if a ticket is still current (not superseded or finished)
    pub fn is_current(&self, ticket: &ResolutionTicket) -> bool {
        self.current.as_ref() == Some(ticket)
    }

    /// Finish `ticket`. Returns `false` when it was stale.
    pub fn finish(&mut self, ticket: &ResolutionTicket) -> bool {
        if self.is_current(ticket) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Drop the fetch in flight.
    pub fn cancel(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<VersionDescriptor> {
        vec![
            VersionDescriptor::new("2.0.0"),
            VersionDescriptor::new("1.0.0"),
            VersionDescriptor::new("1.2.0").tag("stable"),
        ]
    }

    #[test]
    fn test_resolve_latest() {
        let resolved = resolve_version("awesome", catalog(), LATEST).unwrap();
        assert_eq!(resolved.version, "2.0.0");
        assert!(!resolved.is_stale());
        assert_eq!(resolved.version_names(), ["1.0.0", "1.2.0", "2.0.0"]);
    }

    #[test]
    fn test_resolve_tag_to_concrete_name() {
        let resolved = resolve_version("awesome", catalog(), "stable").unwrap();
        assert_eq!(resolved.version, "1.2.0");
        assert_eq!(resolved.latest, "2.0.0");
        assert!(resolved.is_stale());
    }

    #[test]
    fn test_resolve_by_name() {
        let resolved = resolve_version("awesome", catalog(), "1.0.0").unwrap();
        assert_eq!(resolved.version, "1.0.0");
    }

    #[test]
    fn test_resolve_unknown_version() {
        let err = resolve_version("awesome", catalog(), "9.9.9").unwrap_err();
        assert_eq!(
            err,
            DocsError::UnknownVersion {
                project: "awesome".into(),
                version: "9.9.9".into()
            }
        );
    }

    #[test]
    fn test_latest_is_release_not_candidate() {
        let catalog = vec![
            VersionDescriptor::new("2.0.0"),
            VersionDescriptor::new("2.0.0-rc1"),
        ];
        let resolved = resolve_version("awesome", catalog.clone(), LATEST).unwrap();
        assert_eq!(resolved.version, "2.0.0");

        let release = resolve_version("awesome", catalog, "2.0.0").unwrap();
        assert!(!release.is_stale());
    }

    #[test]
    fn test_resolve_empty_catalog() {
        let err = resolve_version("awesome", Vec::new(), LATEST).unwrap_err();
        assert!(matches!(err, DocsError::EmptyVersionList { .. }));
    }

    #[test]
    fn test_tracker_supersedes() {
        let mut tracker = ResolutionTracker::new();
        let first = tracker.start("a");
        let second = tracker.start("b");

        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
        assert!(!tracker.finish(&first));
        assert!(tracker.finish(&second));
        assert!(tracker.in_flight().is_none());
    }

    #[test]
    fn test_tracker_same_project_new_ticket() {
        let mut tracker = ResolutionTracker::new();
        let first = tracker.start("a");
        let again = tracker.start("a");
        assert_ne!(first, again);
        assert!(!tracker.finish(&first));
    }
}
