//! Waypoint Request Pipeline
//!
//! Every outbound call goes through two stages:
//! - outbound: the request config passes through the registered interceptors
//!   (none by default) and is resolved against the base address
//! - inbound: a successful response is unwrapped to its payload; any failure
//!   is handed back to the caller untouched
//!
//! No retries are attempted at either stage.

mod config;
mod error;
mod interceptor;
mod service;

pub use config::{RequestConfig, RequestOptions, DEFAULT_TIMEOUT};
pub use error::RequestError;
pub use interceptor::RequestInterceptor;
pub use service::RequestService;

pub type Result<T> = std::result::Result<T, RequestError>;
