//! Router engine
//!
//! Every navigation runs the same lifecycle:
//! 1. resolve the target into a [`RouteLocation`]
//! 2. run `before_each` hooks in registration order (first non-proceed decision wins)
//! 3. match the route and resolve its view (lazy views are loaded here)
//! 4. commit to history, then run `after_each` hooks
//!
//! A failure in step 3 runs the `on_error` hooks instead of step 4. Exactly
//! one of the two follows step 2 for any transition.

use uuid::Uuid;

use crate::error::NavigationError;
use crate::guard::{Decision, GuardDecision, Next};
use crate::history::History;
use crate::route::{
    normalize_path, strip_query_and_hash, NavigationTarget, Route, RouteLocation, View,
};
use crate::Result;

/// Chained redirects allowed before a navigation is treated as a loop
const MAX_REDIRECTS: usize = 10;

type BeforeHook = Box<dyn Fn(&RouteLocation, &RouteLocation, Next) -> GuardDecision + Send + Sync>;
type AfterHook = Box<dyn Fn(&RouteLocation, &RouteLocation) + Send + Sync>;
type ErrorHook = Box<dyn Fn(&NavigationError, &RouteLocation, &RouteLocation) + Send + Sync>;

/// How a settled navigation updates the history stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
    Traverse(isize),
}

/// Result of a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The transition was committed
    Completed(RouteLocation),
    /// The target is already the current location. No hooks ran, unless a
    /// guard redirected here, in which case the after hooks closed the transition.
    Duplicated,
    /// A guard cancelled the transition
    Aborted,
    /// The transition failed; the error hooks already saw it
    Failed(NavigationError),
}

impl NavigationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, NavigationOutcome::Completed(_))
    }

    pub fn location(&self) -> Option<&RouteLocation> {
        match self {
            NavigationOutcome::Completed(location) => Some(location),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&NavigationError> {
        match self {
            NavigationOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

pub struct Router {
    routes: Vec<Route>,
    history: History,
    current: Option<RouteLocation>,
    current_view: Option<View>,
    before_hooks: Vec<BeforeHook>,
    after_hooks: Vec<AfterHook>,
    error_hooks: Vec<ErrorHook>,
}

impl Router {
    /// Create a router whose history is rooted at `base`
    pub fn new(base: &str) -> Self {
        Self {
            routes: Vec::new(),
            history: History::new(base),
            current: None,
            current_view: None,
            before_hooks: Vec::new(),
            after_hooks: Vec::new(),
            error_hooks: Vec::new(),
        }
    }

    pub fn with_routes(base: &str, routes: impl IntoIterator<Item = Route>) -> Self {
        let mut router = Self::new(base);
        for route in routes {
            router.add_route(route);
        }
        router
    }

    /// Add a route; a route with the same path is replaced
    pub fn add_route(&mut self, route: Route) {
        if let Some(existing) = self.routes.iter_mut().find(|r| r.path == route.path) {
            tracing::debug!(path = %route.path, "Replacing route");
            *existing = route;
        } else {
            tracing::debug!(
                path = %route.path,
                name = ?route.name,
                lazy = route.is_lazy(),
                "Added route"
            );
            self.routes.push(route);
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.iter().any(|r| r.name.as_deref() == Some(name))
    }

    /// Register a pre-transition hook
    pub fn before_each<F>(&mut self, hook: F)
    where
        F: Fn(&RouteLocation, &RouteLocation, Next) -> GuardDecision + Send + Sync + 'static,
    {
        self.before_hooks.push(Box::new(hook));
    }

    /// Register a post-transition hook
    pub fn after_each<F>(&mut self, hook: F)
    where
        F: Fn(&RouteLocation, &RouteLocation) + Send + Sync + 'static,
    {
        self.after_hooks.push(Box::new(hook));
    }

    /// Register an error hook
    pub fn on_error<F>(&mut self, hook: F)
    where
        F: Fn(&NavigationError, &RouteLocation, &RouteLocation) + Send + Sync + 'static,
    {
        self.error_hooks.push(Box::new(hook));
    }

    pub fn current_route(&self) -> Option<&RouteLocation> {
        self.current.as_ref()
    }

    pub fn current_view(&self) -> Option<&View> {
        self.current_view.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Resolve a target without navigating
    pub fn resolve(&self, target: &NavigationTarget) -> Result<RouteLocation> {
        let location = self.locate(target)?;
        if self.find_route(&location.path).is_none() {
            return Err(NavigationError::NotFound(location.path));
        }
        Ok(location)
    }

    pub async fn push(&mut self, target: impl Into<NavigationTarget>) -> NavigationOutcome {
        self.navigate(target.into(), HistoryMode::Push).await
    }

    pub async fn replace(&mut self, target: impl Into<NavigationTarget>) -> NavigationOutcome {
        self.navigate(target.into(), HistoryMode::Replace).await
    }

    pub async fn back(&mut self) -> NavigationOutcome {
        self.go(-1).await
    }

    pub async fn forward(&mut self) -> NavigationOutcome {
        self.go(1).await
    }

    /// Traverse the history by `delta` entries
    pub async fn go(&mut self, delta: isize) -> NavigationOutcome {
        let target = match self.history.peek(delta) {
            Some(entry) => NavigationTarget::Path(entry.full_path.clone()),
            None => return NavigationOutcome::Failed(NavigationError::HistoryOutOfRange(delta)),
        };
        self.navigate(target, HistoryMode::Traverse(delta)).await
    }

    async fn navigate(&mut self, target: NavigationTarget, mode: HistoryMode) -> NavigationOutcome {
        let from = self.current.clone().unwrap_or_else(RouteLocation::start);
        let id = Uuid::new_v4();

        let mut target = target;
        let mut mode = mode;
        let mut redirected_from: Option<RouteLocation> = None;

        for _ in 0..=MAX_REDIRECTS {
            let mut to = match self.locate(&target) {
                Ok(location) => location,
                Err(err) => {
                    tracing::debug!(%id, error = %err, "Navigation target could not be resolved");
                    // Guards already ran for the location that redirected here
                    if let Some(previous) = &redirected_from {
                        self.run_error_hooks(&err, previous, &from);
                    }
                    return NavigationOutcome::Failed(err);
                }
            };
            to.redirected_from = redirected_from.as_ref().map(|r| r.full_path.clone());

            if self.current.as_ref().is_some_and(|c| c.full_path == to.full_path) {
                tracing::debug!(%id, path = %to.full_path, "Duplicated navigation ignored");
                match mode {
                    // Adjacent equal entries still move the position
                    HistoryMode::Traverse(delta) => {
                        self.history.go(delta);
                    }
                    // Guards already ran for the pre-redirect target
                    _ if redirected_from.is_some() => self.run_after_hooks(&to, &from),
                    _ => {}
                }
                return NavigationOutcome::Duplicated;
            }

            tracing::debug!(%id, from = %from.full_path, to = %to.full_path, "Navigation started");

            match self.run_before_hooks(&to, &from) {
                Decision::Proceed => {}
                Decision::Abort => {
                    tracing::debug!(%id, to = %to.full_path, "Navigation aborted by guard");
                    self.run_after_hooks(&to, &from);
                    return NavigationOutcome::Aborted;
                }
                Decision::Redirect(next) => {
                    tracing::debug!(
                        %id,
                        to = %to.full_path,
                        redirect = ?next,
                        "Navigation redirected by guard"
                    );
                    redirected_from = Some(to);
                    target = next;
                    if let HistoryMode::Traverse(_) = mode {
                        mode = HistoryMode::Push;
                    }
                    continue;
                }
            }

            return match self.finalize(&to, mode).await {
                Ok(()) => {
                    tracing::info!(%id, path = %to.full_path, "Navigation completed");
                    self.run_after_hooks(&to, &from);
                    NavigationOutcome::Completed(to)
                }
                Err(err) => {
                    tracing::debug!(%id, path = %to.full_path, error = %err, "Navigation failed");
                    self.run_error_hooks(&err, &to, &from);
                    NavigationOutcome::Failed(err)
                }
            };
        }

        let err = NavigationError::RedirectLoop(
            redirected_from.map(|r| r.full_path).unwrap_or_default(),
        );
        let to = match &target {
            NavigationTarget::Path(path) => RouteLocation::unmatched(normalize_path(path)),
            NavigationTarget::Name(_) => from.clone(),
        };
        self.run_error_hooks(&err, &to, &from);
        NavigationOutcome::Failed(err)
    }

    /// Turn a target into a location. Unmatched paths still yield a location
    /// so the guards run before the failure is reported.
    fn locate(&self, target: &NavigationTarget) -> Result<RouteLocation> {
        match target {
            NavigationTarget::Path(path) => {
                let full_path = normalize_path(path);
                match self.find_route(strip_query_and_hash(&full_path)) {
                    Some(index) => Ok(self.routes[index].location(full_path)),
                    None => Ok(RouteLocation::unmatched(full_path)),
                }
            }
            NavigationTarget::Name(name) => self
                .routes
                .iter()
                .find(|r| r.name.as_deref() == Some(name.as_str()))
                .map(|r| r.location(r.path.clone()))
                .ok_or_else(|| NavigationError::UnknownName(name.clone())),
        }
    }

    fn find_route(&self, path: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.path == path)
    }

    async fn finalize(&mut self, to: &RouteLocation, mode: HistoryMode) -> Result<()> {
        let index = self
            .find_route(&to.path)
            .ok_or_else(|| NavigationError::NotFound(to.path.clone()))?;
        let view = self.routes[index].resolve_view().await?;

        match mode {
            HistoryMode::Push => self.history.push(&to.full_path),
            HistoryMode::Replace => self.history.replace(&to.full_path),
            HistoryMode::Traverse(delta) => {
                if !self.history.go(delta) {
                    self.history.push(&to.full_path);
                }
            }
        }

        self.current = Some(to.clone());
        self.current_view = Some(view);
        Ok(())
    }

    fn run_before_hooks(&self, to: &RouteLocation, from: &RouteLocation) -> Decision {
        for hook in &self.before_hooks {
            let GuardDecision(decision) = hook(to, from, Next::new());
            if decision != Decision::Proceed {
                return decision;
            }
        }
        Decision::Proceed
    }

    fn run_after_hooks(&self, to: &RouteLocation, from: &RouteLocation) {
        for hook in &self.after_hooks {
            hook(to, from);
        }
    }

    fn run_error_hooks(&self, err: &NavigationError, to: &RouteLocation, from: &RouteLocation) {
        if self.error_hooks.is_empty() {
            tracing::warn!(error = %err, to = %to.full_path, "Unhandled navigation error");
        }
        for hook in &self.error_hooks {
            hook(err, to, from);
        }
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("history", &self.history)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewLoadError;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn demo_router() -> Router {
        Router::with_routes(
            "/",
            [
                Route::new("/", View::new("HomeView")).named("home"),
                Route::new("/about", View::new("AboutView"))
                    .named("about")
                    .titled("About"),
                Route::new("/login", View::new("LoginView")).named("login"),
            ],
        )
    }

    /// Records hook invocations as "before:/x", "after:/x", "error:/x"
    fn trace_hooks(router: &mut Router) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&log);
        router.before_each(move |to, _from, next| {
            sink.lock().push(format!("before:{}", to.full_path));
            next.proceed()
        });
        let sink = Arc::clone(&log);
        router.after_each(move |to, _from| sink.lock().push(format!("after:{}", to.full_path)));
        let sink = Arc::clone(&log);
        router.on_error(move |_err, to, _from| sink.lock().push(format!("error:{}", to.full_path)));

        log
    }

    #[tokio::test]
    async fn test_push_runs_hooks_in_order() {
        let mut router = demo_router();
        let log = trace_hooks(&mut router);

        assert!(router.push("/").await.is_completed());
        let outcome = router.push("/about").await;

        assert_eq!(outcome.location().map(|l| l.path.as_str()), Some("/about"));
        assert_eq!(router.current_view(), Some(&View::new("AboutView")));
        assert_eq!(
            *log.lock(),
            vec!["before:/", "after:/", "before:/about", "after:/about"]
        );
    }

    #[tokio::test]
    async fn test_origin_passed_to_hooks() {
        let mut router = demo_router();
        let origins = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&origins);
        router.before_each(move |_to, from, next| {
            sink.lock().push(from.full_path.clone());
            next.proceed()
        });

        router.push("/").await;
        router.push("/about").await;

        assert_eq!(*origins.lock(), vec!["/", "/"]);
    }

    #[tokio::test]
    async fn test_duplicated_navigation_skips_hooks() {
        let mut router = demo_router();
        let log = trace_hooks(&mut router);

        router.push("/about").await;
        let outcome = router.push("/about").await;

        assert_eq!(outcome, NavigationOutcome::Duplicated);
        assert_eq!(log.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_unmatched_path_runs_guard_then_error() {
        let mut router = demo_router();
        let log = trace_hooks(&mut router);

        let outcome = router.push("/missing").await;

        assert_eq!(
            outcome.error(),
            Some(&NavigationError::NotFound("/missing".to_string()))
        );
        assert_eq!(*log.lock(), vec!["before:/missing", "error:/missing"]);
        assert!(router.current_route().is_none());
    }

    #[tokio::test]
    async fn test_unknown_name_runs_no_hooks() {
        let mut router = demo_router();
        let log = trace_hooks(&mut router);

        let outcome = router.push(NavigationTarget::named("nope")).await;

        assert_eq!(
            outcome.error(),
            Some(&NavigationError::UnknownName("nope".to_string()))
        );
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_push_by_name_and_query() {
        let mut router = demo_router();

        let outcome = router.push(NavigationTarget::named("about")).await;
        assert_eq!(outcome.location().and_then(|l| l.title()), Some("About"));

        let outcome = router.push("/about?tab=team#top").await;
        let location = outcome.location().unwrap();
        assert_eq!(location.path, "/about");
        assert_eq!(location.full_path, "/about?tab=team#top");
        assert_eq!(location.name.as_deref(), Some("about"));
    }

    #[tokio::test]
    async fn test_lazy_view_failure_then_retry() {
        let attempts = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&attempts);
        let mut router = demo_router();
        router.add_route(Route::lazy("/reports", move || {
            let attempt = {
                let mut n = counter.lock();
                *n += 1;
                *n
            };
            async move {
                if attempt == 1 {
                    Err(ViewLoadError::new("Network fail"))
                } else {
                    Ok(View::new("ReportsView"))
                }
            }
        }));
        let log = trace_hooks(&mut router);

        let outcome = router.push("/reports").await;
        assert!(matches!(outcome, NavigationOutcome::Failed(NavigationError::ViewLoad(_))));
        assert!(router.history().is_empty());

        // Failures do not block later navigations
        assert!(router.push("/reports").await.is_completed());
        assert_eq!(*attempts.lock(), 2);
        assert_eq!(
            *log.lock(),
            vec!["before:/reports", "error:/reports", "before:/reports", "after:/reports"]
        );
    }

    #[tokio::test]
    async fn test_guard_abort_runs_after_hooks() {
        let mut router = demo_router();
        router.before_each(|to, _from, next| {
            if to.path == "/about" {
                next.abort()
            } else {
                next.proceed()
            }
        });
        let log = trace_hooks(&mut router);

        router.push("/").await;
        let outcome = router.push("/about").await;

        assert_eq!(outcome, NavigationOutcome::Aborted);
        assert_eq!(router.current_route().map(|l| l.path.as_str()), Some("/"));
        // The aborting guard runs first, so the tracing guard never sees /about
        assert_eq!(*log.lock(), vec!["before:/", "after:/", "after:/about"]);
    }

    #[tokio::test]
    async fn test_guard_redirect() {
        let mut router = demo_router();
        router.before_each(|to, _from, next| {
            if to.path == "/about" {
                next.redirect(NavigationTarget::named("login"))
            } else {
                next.proceed()
            }
        });

        let outcome = router.push("/about").await;
        let location = outcome.location().unwrap();

        assert_eq!(location.path, "/login");
        assert_eq!(location.redirected_from.as_deref(), Some("/about"));
        assert_eq!(router.history().location(), Some("/login"));
    }

    #[tokio::test]
    async fn test_redirect_to_unknown_name_reports_error() {
        let mut router = demo_router();
        let log = trace_hooks(&mut router);
        router.before_each(|to, _from, next| {
            if to.path == "/about" {
                next.redirect(NavigationTarget::named("signin"))
            } else {
                next.proceed()
            }
        });

        let outcome = router.push("/about").await;

        assert_eq!(
            outcome.error(),
            Some(&NavigationError::UnknownName("signin".to_string()))
        );
        assert_eq!(*log.lock(), vec!["before:/about", "error:/about"]);
        assert!(router.current_route().is_none());
    }

    #[tokio::test]
    async fn test_redirect_to_current_location_runs_after_hooks() {
        let mut router = demo_router();
        router.before_each(|to, _from, next| {
            if to.path == "/about" {
                next.redirect("/login")
            } else {
                next.proceed()
            }
        });
        let log = trace_hooks(&mut router);

        router.push("/login").await;
        let outcome = router.push("/about").await;

        assert_eq!(outcome, NavigationOutcome::Duplicated);
        assert_eq!(*log.lock(), vec!["before:/login", "after:/login", "after:/login"]);
        assert_eq!(router.history().len(), 1);
    }

    #[tokio::test]
    async fn test_redirect_during_traversal_pushes() {
        let mut router = demo_router();
        router.before_each(|to, from, next| {
            if to.path == "/" && from.path == "/about" {
                next.redirect("/login")
            } else {
                next.proceed()
            }
        });
        let log = trace_hooks(&mut router);

        router.push("/").await;
        router.push("/about").await;
        let outcome = router.back().await;

        assert_eq!(outcome.location().map(|l| l.path.as_str()), Some("/login"));
        let entries: Vec<_> = router
            .history()
            .entries()
            .iter()
            .map(|e| e.full_path.as_str())
            .collect();
        assert_eq!(entries, vec!["/", "/about", "/login"]);
        assert_eq!(router.history().location(), Some("/login"));
        assert_eq!(
            *log.lock(),
            vec![
                "before:/",
                "after:/",
                "before:/about",
                "after:/about",
                "before:/login",
                "after:/login",
            ]
        );
    }

    #[tokio::test]
    async fn test_back_over_equal_entry_moves_position() {
        let mut router = demo_router();
        let log = trace_hooks(&mut router);

        router.push("/").await;
        router.push("/about").await;
        router.replace("/").await;
        log.lock().clear();

        let outcome = router.back().await;

        assert_eq!(outcome, NavigationOutcome::Duplicated);
        assert!(!router.history().can_go_back());
        assert!(router.history().can_go_forward());
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_loop_reported() {
        let mut router = demo_router();
        router.before_each(|to, _from, next| {
            if to.path == "/about" {
                next.redirect("/login")
            } else {
                next.redirect("/about")
            }
        });
        let errors = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&errors);
        router.on_error(move |_err, _to, _from| *sink.lock() += 1);

        let outcome = router.push("/about").await;

        assert!(matches!(outcome, NavigationOutcome::Failed(NavigationError::RedirectLoop(_))));
        assert_eq!(*errors.lock(), 1);
    }

    #[tokio::test]
    async fn test_back_and_forward() {
        let mut router = Router::with_routes(
            "/app/",
            [
                Route::new("/", View::new("HomeView")),
                Route::new("/about", View::new("AboutView")),
            ],
        );
        let log = trace_hooks(&mut router);

        router.push("/").await;
        router.push("/about").await;
        assert_eq!(router.history().href("/about"), "/app/about");

        let outcome = router.back().await;
        assert_eq!(outcome.location().map(|l| l.path.as_str()), Some("/"));
        assert_eq!(router.history().len(), 2);
        assert!(router.history().can_go_forward());

        assert!(router.forward().await.is_completed());
        assert_eq!(router.history().location(), Some("/about"));

        assert_eq!(
            router.forward().await,
            NavigationOutcome::Failed(NavigationError::HistoryOutOfRange(1))
        );
        assert_eq!(log.lock().len(), 8);
    }

    #[tokio::test]
    async fn test_replace_keeps_history_length() {
        let mut router = demo_router();

        router.push("/").await;
        router.replace("/about").await;

        assert_eq!(router.history().len(), 1);
        assert_eq!(router.history().location(), Some("/about"));
    }

    #[test]
    fn test_resolve() {
        let router = demo_router();

        let location = router.resolve(&NavigationTarget::named("about")).unwrap();
        assert_eq!(location.path, "/about");

        assert!(matches!(
            router.resolve(&"/missing".into()),
            Err(NavigationError::NotFound(_))
        ));
    }

    #[test]
    fn test_add_route_replaces_same_path() {
        let mut router = demo_router();
        router.add_route(Route::new("/about", View::new("NewAbout")));

        assert_eq!(router.routes().len(), 3);
        assert!(!router.has_route("about"));
    }
}
