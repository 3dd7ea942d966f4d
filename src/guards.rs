//! History back-guard policies.
//!
//! When the user presses "back", the embedded content may already have
//! pushed hidden entries of its own (typically one per outer navigation),
//! so a single back gesture lands on an entry that shows the same page.
//! A [`BackGuardPolicy`] decides how many extra programmatic back steps the
//! page takes before reconciling the canonical location with the route.
//!
//! # Built-in policies
//!
//! | Policy | Extra steps |
//! |--------|-------------|
//! | [`SingleHiddenEntry`] | 1 (default) |
//! | [`NoCompensation`] | 0 |
//! | [`FixedSteps`] | n |
//! | [`policy_fn`] | computed per pop |
//!
//! The one-hidden-entry assumption is a heuristic. Nothing guarantees how
//! many entries the embedded content creates, which is why the policy is
//! pluggable.
//!
//! # Example
//!
//! ```
//! use docat_navigator::{policy_fn, BackGuardPolicy, Location};
//!
//! // Only compensate while the embedded docs are on a page with a fragment
//! let policy = policy_fn(|location: &Location| usize::from(!location.fragment.is_empty()));
//!
//! let loc = Location::new("awesome", "1.0.0", "index.html").with_fragment("top");
//! assert_eq!(policy.extra_back_steps(&loc), 1);
//! ```

use crate::location::Location;

/// Decides how a back gesture is compensated.
pub trait BackGuardPolicy {
    /// Extra back steps to take after a user back gesture.
    ///
    /// `location` is the canonical location before the pop.
    fn extra_back_steps(&self, location: &Location) -> usize;

    /// Policy name for logs.
    fn name(&self) -> &'static str {
        "BackGuardPolicy"
    }
}

/// Assumes one hidden entry per outer navigation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleHiddenEntry;

impl BackGuardPolicy for SingleHiddenEntry {
    fn extra_back_steps(&self, _location: &Location) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SingleHiddenEntry"
    }
}

/// Takes back gestures at face value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompensation;

impl BackGuardPolicy for NoCompensation {
    fn extra_back_steps(&self, _location: &Location) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "NoCompensation"
    }
}

/// Always takes the same number of extra steps.
#[derive(Debug, Clone, Copy)]
pub struct FixedSteps(pub usize);

impl BackGuardPolicy for FixedSteps {
    fn extra_back_steps(&self, _location: &Location) -> usize {
        self.0
    }

    fn name(&self) -> &'static str {
        "FixedSteps"
    }
}

/// Create a policy from a function or closure.
pub const fn policy_fn<F>(f: F) -> FnPolicy<F>
where
    F: Fn(&Location) -> usize,
{
    FnPolicy { f }
}

/// Policy created from a function or closure.
pub struct FnPolicy<F> {
    f: F,
}

impl<F> BackGuardPolicy for FnPolicy<F>
where
    F: Fn(&Location) -> usize,
{
    fn extra_back_steps(&self, location: &Location) -> usize {
        (self.f)(location)
    }

    fn name(&self) -> &'static str {
        "FnPolicy"
    }
}
