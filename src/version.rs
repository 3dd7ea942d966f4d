//! Version catalog ordering.
//!
//! Documentation versions are free-form names (`1.2.0`, `v2.0`, `main`), so
//! ordering is lenient: each name is coerced to `major.minor.patch` from its
//! first numeric run, the way release tags are usually read.
//!
//! | Name          | Coerced   |
//! |---------------|-----------|
//! | `1.2.3`       | `1.2.3`   |
//! | `v2`          | `2.0.0`   |
//! | `1.4-beta`    | `1.4.0`   |
//! | `release-3.1` | `3.1.0`   |
//! | `main`        | *(none)*  |
//!
//! Names that cannot be coerced sort below all others. On equal numbers a
//! pre-release (`2.0.0-rc1`) sorts below its release (`2.0.0`). Remaining
//! ties are broken by plain string order so that [`compare_versions`] is a
//! total order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Tag that pins a descriptor as the latest version.
pub const LATEST_TAG: &str = "latest";

/// One entry of a project's version catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDescriptor {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl VersionDescriptor {
    /// Create a descriptor without tags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
        }
    }

    /// Add a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether `token` is this descriptor's name or one of its tags.
    pub fn answers_to(&self, token: &str) -> bool {
        self.name == token || self.tags.iter().any(|t| t == token)
    }
}

/// Numeric `major.minor.patch` triple coerced from a version name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SemVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemVersion {
    /// Create a version from its parts.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Coerce the first `N[.N[.N]]` run of `name`; missing parts are zero.
    pub fn coerce(name: &str) -> Option<Self> {
        Self::coerce_with_suffix(name).map(|(version, _)| version)
    }

    /// Like [`SemVersion::coerce`], also returning what follows the run.
    fn coerce_with_suffix(name: &str) -> Option<(Self, &str)> {
        let start = name.find(|c: char| c.is_ascii_digit())?;
        let mut parts = [0u64; 3];
        let mut rest = &name[start..];

        for (i, part) in parts.iter_mut().enumerate() {
            if i > 0 {
                match rest.strip_prefix('.') {
                    Some(after) if after.starts_with(|c: char| c.is_ascii_digit()) => {
                        rest = after;
                    }
                    _ => break,
                }
            }
            let digits = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            *part = rest[..digits].parse().ok()?;
            rest = &rest[digits..];
        }

        Some((Self::new(parts[0], parts[1], parts[2]), rest))
    }
}

/// Whether the text after the numeric run marks a pre-release
/// (`-rc1`, `-beta.2`, `rc1`). Build metadata (`+...`) does not.
fn is_prerelease_suffix(suffix: &str) -> bool {
    suffix.starts_with('-') || suffix.starts_with(|c: char| c.is_ascii_alphabetic())
}

impl fmt::Display for SemVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Semantic-version comparison of two descriptors by name.
pub fn compare_versions(a: &VersionDescriptor, b: &VersionDescriptor) -> Ordering {
    compare_names(&a.name, &b.name)
}

fn compare_names(a: &str, b: &str) -> Ordering {
    let by_version = match (
        SemVersion::coerce_with_suffix(a),
        SemVersion::coerce_with_suffix(b),
    ) {
        // a pre-release ranks below the release it leads up to
        (Some((x, x_suffix)), Some((y, y_suffix))) => x.cmp(&y).then_with(|| {
            is_prerelease_suffix(y_suffix).cmp(&is_prerelease_suffix(x_suffix))
        }),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };
    by_version.then_with(|| a.cmp(b))
}

/// Sort a catalog ascending by semantic version.
pub fn sort_catalog(catalog: &mut [VersionDescriptor]) {
    catalog.sort_by(compare_versions);
}

/// The latest version of a catalog.
///
/// A descriptor tagged `latest` wins; otherwise the maximum by
/// [`compare_versions`]. `None` for an empty catalog.
pub fn latest_version(catalog: &[VersionDescriptor]) -> Option<&VersionDescriptor> {
    catalog
        .iter()
        .find(|descriptor| descriptor.tags.iter().any(|t| t == LATEST_TAG))
        .or_else(|| catalog.iter().max_by(|a, b| compare_versions(a, b)))
}
