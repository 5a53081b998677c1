//! Waypoint Navigation
//!
//! In-app router with three extension points:
//! - `before_each`: runs before a transition is committed, must hand back a [`GuardDecision`]
//! - `after_each`: runs once the transition settles without error
//! - `on_error`: runs when the transition fails (unmatched path, view load failure)
//!
//! [`NavigationLifecycle`] registers against all three to drive the
//! [`ProgressIndicator`] and the [`DocumentTitle`].

mod error;
mod guard;
mod history;
mod lifecycle;
mod progress;
mod route;
mod router;
mod title;

pub use error::{NavigationError, ViewLoadError};
pub use guard::{GuardDecision, Next};
pub use history::{History, HistoryEntry};
pub use lifecycle::{compose_title, NavigationLifecycle};
pub use progress::{ProgressIndicator, ProgressState};
pub use route::{NavigationTarget, Route, RouteLocation, RouteMeta, View, ViewFuture};
pub use router::{NavigationOutcome, Router};
pub use title::DocumentTitle;

pub type Result<T> = std::result::Result<T, NavigationError>;
