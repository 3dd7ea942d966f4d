//! Error handling for the docs page.
//!
//! This module defines the failures a page load or an embedded-content
//! report can run into:
//!
//! - [`DocsError`]: the taxonomy of load and reconciliation failures
//!   (missing project, empty catalog, unknown version, malformed embedded
//!   URL, catalog fetch failure).
//! - [`RepositoryError`]: what a [`DocsRepository`](crate::DocsRepository)
//!   returns when a catalog cannot be fetched or decoded.
//!
//! Every [`DocsError`] except [`DocsError::MalformedEmbeddedUrl`] ends the
//! current load attempt and is rendered as the same not-found page. The
//! distinction between causes is kept for logs and for callers inspecting
//! [`PageState::Failed`](crate::PageState::Failed).
//!
//! # Examples
//!
//! ```
//! use docat_navigator::DocsError;
//!
//! let err = DocsError::UnknownVersion {
//!     project: "awesome".into(),
//!     version: "9.9.9".into(),
//! };
//! assert!(err.is_not_found());
//! assert_eq!(err.to_string(), "Unknown version '9.9.9' for project 'awesome'");
//! ```

use std::fmt;

// ============================================================================
// DocsError
// ============================================================================

/// Failures of a page load or of an embedded navigation report.
#[derive(Debug, Clone, PartialEq)]
pub enum DocsError {
    /// The route did not name a project
    MissingProject,

    /// The catalog for the project is empty
    EmptyVersionList { project: String },

    /// The requested version is neither a version name nor a tag
    UnknownVersion { project: String, version: String },

    /// An embedded navigation report lacked the delimiter segment
    MalformedEmbeddedUrl { url: String },

    /// Fetching or decoding the catalog failed
    Resolution {
        project: String,
        source: RepositoryError,
    },
}

impl DocsError {
    /// Whether this failure renders the not-found page.
    ///
    /// A malformed embedded URL is ignored rather than surfaced.
    pub fn is_not_found(&self) -> bool {
        !matches!(self, DocsError::MalformedEmbeddedUrl { .. })
    }

    /// The project the failure concerns, if any.
    pub fn project(&self) -> Option<&str> {
        match self {
            DocsError::EmptyVersionList { project }
            | DocsError::UnknownVersion { project, .. }
            | DocsError::Resolution { project, .. } => Some(project),
            DocsError::MissingProject | DocsError::MalformedEmbeddedUrl { .. } => None,
        }
    }
}

impl fmt::Display for DocsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocsError::MissingProject => write!(f, "No project given in route"),
            DocsError::EmptyVersionList { project } => {
                write!(f, "Project '{}' has no versions", project)
            }
            DocsError::UnknownVersion { project, version } => {
                write!(f, "Unknown version '{}' for project '{}'", version, project)
            }
            DocsError::MalformedEmbeddedUrl { url } => {
                write!(f, "Embedded URL '{}' is missing the docs delimiter", url)
            }
            DocsError::Resolution { project, source } => {
                write!(f, "Failed to load versions of '{}': {}", project, source)
            }
        }
    }
}

impl std::error::Error for DocsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocsError::Resolution { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// RepositoryError
// ============================================================================

/// Errors returned by a docs repository.
#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// Network-level failure (timeout, DNS, connection refused)
    Network(String),
    /// The server answered with a non-success status
    Api { status: u16, message: String },
    /// The response body could not be decoded
    Parse(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Network(msg) => write!(f, "network error: {msg}"),
            RepositoryError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            RepositoryError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(feature = "http")]
impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            RepositoryError::Network(err.to_string())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_load_failures_render_not_found() {
        let failures = [
            DocsError::MissingProject,
            DocsError::EmptyVersionList {
                project: "p".into(),
            },
            DocsError::UnknownVersion {
                project: "p".into(),
                version: "9.9.9".into(),
            },
            DocsError::Resolution {
                project: "p".into(),
                source: RepositoryError::Network("timeout".into()),
            },
        ];
        for failure in &failures {
            assert!(failure.is_not_found(), "{failure} should be not-found");
        }
    }

    #[test]
    fn test_malformed_embedded_url_is_ignored() {
        let err = DocsError::MalformedEmbeddedUrl {
            url: "http://host/other/page".into(),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.project(), None);
    }

    #[test]
    fn test_resolution_error_display_and_source() {
        let err = DocsError::Resolution {
            project: "awesome".into(),
            source: RepositoryError::Api {
                status: 404,
                message: "not found".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Failed to load versions of 'awesome': API error (HTTP 404): not found"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.project(), Some("awesome"));
    }
}
