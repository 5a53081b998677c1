//! Application container

use std::sync::Arc;

use waypoint_navigation::{DocumentTitle, NavigationLifecycle, ProgressIndicator, Route, Router};
use waypoint_request::{RequestOptions, RequestService};

use crate::config::Config;
use crate::Result;

/// Owns the router with the lifecycle installed, the shared progress and
/// title state, and the request service bound to `base_api`.
pub struct App {
    config: Config,
    router: Router,
    progress: Arc<ProgressIndicator>,
    title: Arc<DocumentTitle>,
    request: RequestService,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_routes(config, Vec::new())
    }

    /// Installs the global subscriber at the configured verbosity unless the
    /// host already did
    pub fn with_routes(config: Config, routes: impl IntoIterator<Item = Route>) -> Result<Self> {
        crate::init_logging(config.verbose);

        let request = RequestService::new(RequestOptions::new(config.base_api.clone()))?;

        let progress = Arc::new(ProgressIndicator::new());
        let title = Arc::new(DocumentTitle::new(config.app_title.clone()));

        let mut router = Router::with_routes(&config.public_path, routes);
        NavigationLifecycle::new(
            config.app_title.clone(),
            Arc::clone(&progress),
            Arc::clone(&title),
        )
        .install(&mut router);

        tracing::info!(
            app_title = %config.app_title,
            base_api = %config.base_api,
            public_path = %config.public_path,
            routes = router.routes().len(),
            "Application initialized"
        );

        Ok(Self {
            config,
            router,
            progress,
            title,
            request,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Needed to register routes and hooks, and to navigate
    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    pub fn request(&self) -> &RequestService {
        &self.request
    }

    pub fn progress(&self) -> &ProgressIndicator {
        &self.progress
    }

    pub fn document_title(&self) -> String {
        self.title.get()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("app_title", &self.config.app_title)
            .field("document_title", &self.title.get())
            .field("progress", &self.progress.state())
            .finish_non_exhaustive()
    }
}
