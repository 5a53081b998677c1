//! Navigation error types

use thiserror::Error;

/// Failure reported by a lazy view loader
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ViewLoadError {
    message: String,
}

impl ViewLoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches path: {0}")]
    NotFound(String),

    #[error("No route named: {0}")]
    UnknownName(String),

    #[error("Failed to load view: {0}")]
    ViewLoad(#[from] ViewLoadError),

    #[error("No history entry at offset {0}")]
    HistoryOutOfRange(isize),

    #[error("Too many redirects while navigating to {0}")]
    RedirectLoop(String),
}
