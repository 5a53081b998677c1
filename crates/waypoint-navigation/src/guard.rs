//! Pre-transition continuation
//!
//! A `before_each` hook receives a [`Next`] and has to return the
//! [`GuardDecision`] one of its methods produces. `GuardDecision` cannot be
//! built any other way, so a hook cannot forget to continue the navigation.

use crate::route::NavigationTarget;

/// Continuation handed to every pre-transition hook
#[derive(Debug)]
#[must_use = "a guard must return the decision produced by `Next`"]
pub struct Next {
    _private: (),
}

impl Next {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }

    /// Let the transition continue
    pub fn proceed(self) -> GuardDecision {
        GuardDecision(Decision::Proceed)
    }

    /// Cancel the transition and stay on the current route
    pub fn abort(self) -> GuardDecision {
        GuardDecision(Decision::Abort)
    }

    /// Cancel the transition and start a new one towards `target`
    pub fn redirect(self, target: impl Into<NavigationTarget>) -> GuardDecision {
        GuardDecision(Decision::Redirect(target.into()))
    }
}

/// Outcome of a pre-transition hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardDecision(pub(crate) Decision);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Decision {
    Proceed,
    Abort,
    Redirect(NavigationTarget),
}

impl GuardDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self.0, Decision::Proceed)
    }
}
