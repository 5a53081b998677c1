//! Route declarations and resolved locations

use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use crate::error::ViewLoadError;

/// Per-route metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Display title for the page
    pub title: Option<String>,
}

/// A resolved page view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
}

impl View {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

pub type ViewFuture = BoxFuture<'static, Result<View, ViewLoadError>>;

type ViewLoader = Arc<dyn Fn() -> ViewFuture + Send + Sync>;

enum ViewSource {
    Eager(View),
    /// Loaded on first visit, cached once it succeeds
    Lazy(ViewLoader),
}

/// A declared route
pub struct Route {
    pub path: String,
    pub name: Option<String>,
    pub meta: RouteMeta,
    source: ViewSource,
    resolved: Option<View>,
}

impl Route {
    pub fn new(path: impl Into<String>, view: View) -> Self {
        Self::with_source(path.into(), ViewSource::Eager(view))
    }

    /// Declare a route whose view is fetched the first time it is visited
    pub fn lazy<F, Fut>(path: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<View, ViewLoadError>> + Send + 'static,
    {
        let loader: ViewLoader = Arc::new(move || loader().boxed());
        Self::with_source(path.into(), ViewSource::Lazy(loader))
    }

    fn with_source(path: String, source: ViewSource) -> Self {
        Self {
            path: normalize_path(&path),
            name: None,
            meta: RouteMeta::default(),
            source,
            resolved: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.source, ViewSource::Lazy(_))
    }

    /// Whether the view is available without running a loader
    pub fn is_resolved(&self) -> bool {
        matches!(self.source, ViewSource::Eager(_)) || self.resolved.is_some()
    }

    pub(crate) async fn resolve_view(&mut self) -> Result<View, ViewLoadError> {
        if let Some(view) = &self.resolved {
            return Ok(view.clone());
        }

        match &self.source {
            ViewSource::Eager(view) => Ok(view.clone()),
            ViewSource::Lazy(loader) => {
                let view = loader().await?;
                tracing::debug!(path = %self.path, view = %view.name, "Lazy view loaded");
                self.resolved = Some(view.clone());
                Ok(view)
            }
        }
    }

    pub(crate) fn location(&self, full_path: String) -> RouteLocation {
        RouteLocation {
            path: self.path.clone(),
            full_path,
            name: self.name.clone(),
            meta: self.meta.clone(),
            redirected_from: None,
        }
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("meta", &self.meta)
            .field("lazy", &self.is_lazy())
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Where a navigation should go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    /// A path, optionally with query string and fragment
    Path(String),
    /// A route name
    Name(String),
}

impl NavigationTarget {
    pub fn named(name: impl Into<String>) -> Self {
        NavigationTarget::Name(name.into())
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        NavigationTarget::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        NavigationTarget::Path(path)
    }
}

/// Descriptor of one side of a transition (target or origin)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLocation {
    /// Path used for matching, without query or fragment
    pub path: String,
    /// Path as requested, including query and fragment
    pub full_path: String,
    pub name: Option<String>,
    pub meta: RouteMeta,
    /// Full path of the navigation a guard redirected away from
    pub redirected_from: Option<String>,
}

impl RouteLocation {
    /// Origin of the very first navigation
    pub fn start() -> Self {
        Self::unmatched("/".to_string())
    }

    pub(crate) fn unmatched(full_path: String) -> Self {
        Self {
            path: strip_query_and_hash(&full_path).to_string(),
            full_path,
            name: None,
            meta: RouteMeta::default(),
            redirected_from: None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }
}

/// Ensure a single leading slash
pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

pub(crate) fn strip_query_and_hash(full_path: &str) -> &str {
    let cut = full_path.find(['?', '#']).unwrap_or(full_path.len());
    &full_path[..cut]
}
