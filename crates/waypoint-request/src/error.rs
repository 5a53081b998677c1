//! Request error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[source] url::ParseError),

    #[error("Invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The HTTP client could not assemble the request
    #[error("Failed to build request: {0}")]
    Build(#[source] reqwest::Error),

    /// Raised by an outbound interceptor
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Failure produced by the transport, forwarded as-is
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    /// True for failures raised while building the request, before anything
    /// was sent
    pub fn is_preparation(&self) -> bool {
        matches!(
            self,
            RequestError::InvalidBaseUrl(_)
                | RequestError::InvalidUrl { .. }
                | RequestError::InvalidHeader { .. }
                | RequestError::Encode(_)
                | RequestError::Build(_)
                | RequestError::Rejected(_)
        )
    }

    /// The underlying transport error, if this is one
    pub fn transport(&self) -> Option<&reqwest::Error> {
        match self {
            RequestError::Transport(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of a rejected response
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        self.transport().and_then(|err| err.status())
    }
}
