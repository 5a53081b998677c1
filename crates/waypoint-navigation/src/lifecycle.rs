//! Navigation lifecycle interceptor
//!
//! Wraps every transition with progress feedback and a title update, and
//! contains transition errors:
//! - before: start the progress indicator, set the document title, always proceed
//! - after: finish the progress indicator
//! - error: finish the progress indicator and log a warning; never rethrow

use std::sync::Arc;

use crate::error::NavigationError;
use crate::guard::{GuardDecision, Next};
use crate::progress::ProgressIndicator;
use crate::route::RouteLocation;
use crate::router::Router;
use crate::title::DocumentTitle;

/// `"{route title} - {app title}"`, or the app title alone when the route has
/// no (non-empty) title
pub fn compose_title(route_title: Option<&str>, app_title: &str) -> String {
    match route_title.filter(|t| !t.is_empty()) {
        Some(title) => format!("{} - {}", title, app_title),
        None => app_title.to_string(),
    }
}

pub struct NavigationLifecycle {
    app_title: String,
    progress: Arc<ProgressIndicator>,
    title: Arc<DocumentTitle>,
}

impl NavigationLifecycle {
    pub fn new(
        app_title: impl Into<String>,
        progress: Arc<ProgressIndicator>,
        title: Arc<DocumentTitle>,
    ) -> Self {
        Self {
            app_title: app_title.into(),
            progress,
            title,
        }
    }

    pub fn app_title(&self) -> &str {
        &self.app_title
    }

    pub fn page_title(&self, to: &RouteLocation) -> String {
        compose_title(to.title(), &self.app_title)
    }

    pub fn before_transition(
        &self,
        to: &RouteLocation,
        _from: &RouteLocation,
        next: Next,
    ) -> GuardDecision {
        self.progress.start();

        let title = self.page_title(to);
        tracing::debug!(path = %to.full_path, title = %title, "Updating document title");
        self.title.set(title);

        next.proceed()
    }

    pub fn after_transition(&self, _to: &RouteLocation, _from: &RouteLocation) {
        self.progress.done();
    }

    pub fn on_error(&self, error: &NavigationError, to: &RouteLocation, _from: &RouteLocation) {
        self.progress.done();
        tracing::warn!(path = %to.full_path, "Route error: {}", error);
    }

    /// Register the three hooks on `router`
    pub fn install(self, router: &mut Router) {
        let lifecycle = Arc::new(self);

        let hooks = Arc::clone(&lifecycle);
        router.before_each(move |to, from, next| hooks.before_transition(to, from, next));

        let hooks = Arc::clone(&lifecycle);
        router.after_each(move |to, from| hooks.after_transition(to, from));

        router.on_error(move |error, to, from| lifecycle.on_error(error, to, from));
    }
}
