//! Page lifecycle state machine.
//!
//! The docs page moves through four states:
//!
//! - [`PageState::Uninitialized`]: mounted, nothing requested yet;
//! - [`PageState::ResolvingVersion`]: a catalog fetch is in flight;
//! - [`PageState::Ready`]: the version is resolved, docs can be shown;
//! - [`PageState::Failed`]: the load failed; the not-found page is shown.
//!
//! # Transition table
//!
//! Every location accepted by the store is fed through [`plan_for_location`];
//! every finished fetch through [`PageState::after_resolution`].
//!
//! | From | Event | Condition | Step | To |
//! |------|-------|-----------|------|----|
//! | any | location | project empty | [`Step::Fail`] | Failed |
//! | ResolvingVersion | location | same project as the fetch | [`Step::Stay`] | ResolvingVersion |
//! | any | location | catalog of that project loaded | [`Step::Revalidate`] | Ready / Failed |
//! | Failed | location | same project, no catalog | [`Step::Stay`] | Failed |
//! | any | location | otherwise | [`Step::Resolve`] | ResolvingVersion |
//! | ResolvingVersion | fetch done | ticket current, version found | | Ready |
//! | ResolvingVersion | fetch done | ticket current, any failure | | Failed |
//! | any | fetch done | ticket stale | | unchanged |
//!
//! Failures are terminal for the load attempt: a failed fetch is not
//! retried until the route names another project.

use crate::error::DocsError;
use crate::location::Location;
use crate::resolve::{Resolution, ResolutionTicket};

/// Lifecycle state of the docs page.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PageState {
    /// Mounted, no location yet
    #[default]
    Uninitialized,
    /// Waiting for the catalog of `ticket.project()`
    ResolvingVersion { ticket: ResolutionTicket },
    /// Version resolved against the catalog
    Ready { resolution: Resolution },
    /// Load failed; rendered as not found
    Failed { error: DocsError },
}

impl PageState {
    /// State name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            PageState::Uninitialized => "Uninitialized",
            PageState::ResolvingVersion { .. } => "ResolvingVersion",
            PageState::Ready { .. } => "Ready",
            PageState::Failed { .. } => "Failed",
        }
    }

    /// Check if the docs can be shown
    pub fn is_ready(&self) -> bool {
        matches!(self, PageState::Ready { .. })
    }

    /// Check if the load failed
    pub fn is_failed(&self) -> bool {
        matches!(self, PageState::Failed { .. })
    }

    /// Check if the page is still waiting for something
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            PageState::Uninitialized | PageState::ResolvingVersion { .. }
        )
    }

    /// The resolution, when ready.
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            PageState::Ready { resolution } => Some(resolution),
            _ => None,
        }
    }

    /// The failure, when failed.
    pub fn error(&self) -> Option<&DocsError> {
        match self {
            PageState::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// The fetch in flight, when resolving.
    pub fn ticket(&self) -> Option<&ResolutionTicket> {
        match self {
            PageState::ResolvingVersion { ticket } => Some(ticket),
            _ => None,
        }
    }

    /// State after a fetch for `ticket` finished and its result was resolved.
    ///
    /// Returns `None` when the ticket is not the one this state waits for.
    pub fn after_resolution(
        &self,
        ticket: &ResolutionTicket,
        outcome: Result<Resolution, DocsError>,
    ) -> Option<PageState> {
        match self {
            PageState::ResolvingVersion { ticket: waiting } if waiting == ticket => {
                Some(match outcome {
                    Ok(resolution) => PageState::Ready { resolution },
                    Err(error) => PageState::Failed { error },
                })
            }
            _ => None,
        }
    }
}

/// What the page does after the store accepted a location.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Start fetching the catalog of the location's project
    Resolve,
    /// Resolve the version against the catalog already loaded
    Revalidate,
    /// Fail the load
    Fail(DocsError),
    /// Keep the current state
    Stay,
}

/// Decide the step for a newly accepted `location`.
///
/// `catalog_project` names the project whose catalog is loaded, if any.
pub fn plan_for_location(
    state: &PageState,
    location: &Location,
    catalog_project: Option<&str>,
) -> Step {
    if location.project.is_empty() {
        return Step::Fail(DocsError::MissingProject);
    }

    if let PageState::ResolvingVersion { ticket } = state {
        if ticket.project() == location.project {
            return Step::Stay;
        }
    }

    if catalog_project == Some(location.project.as_str()) {
        return Step::Revalidate;
    }

    if let PageState::Failed { error } = state {
        if error.project() == Some(location.project.as_str()) {
            return Step::Stay;
        }
    }

    Step::Resolve
}
