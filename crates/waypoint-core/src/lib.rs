//! Waypoint Core
//!
//! Wires the navigation lifecycle and the request pipeline to a single
//! application configuration.

mod app;
mod config;
mod error;

pub use app::App;
pub use config::{Config, EnvValue};
pub use error::CoreError;

// Re-export the building blocks
pub use waypoint_navigation::{
    compose_title, DocumentTitle, GuardDecision, NavigationError, NavigationLifecycle,
    NavigationOutcome, NavigationTarget, Next, ProgressIndicator, ProgressState, Route,
    RouteLocation, RouteMeta, Router, View, ViewLoadError,
};
pub use waypoint_request::{
    RequestConfig, RequestError, RequestInterceptor, RequestOptions, RequestService,
    DEFAULT_TIMEOUT,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Called by [`App`] with [`Config::verbose`]; a no-op once a global
/// subscriber is installed.
///
/// `RUST_LOG` wins when set; otherwise `debug` in verbose mode and `info`
/// without it.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (tests, embedding hosts)
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
