//! Outbound request interceptors

use crate::config::RequestConfig;
use crate::Result;

/// Runs on every request config before it is sent.
///
/// Returning an error rejects the call; the error reaches the caller as-is.
///
/// ```rust,no_run
/// use waypoint_request::{RequestConfig, RequestOptions, RequestService, Result};
///
/// # fn build() -> Result<RequestService> {
/// let service = RequestService::new(RequestOptions::new("https://api.example.com"))?
///     .with_interceptor(|config: RequestConfig| -> Result<RequestConfig> {
///         Ok(config.header("x-client", "waypoint"))
///     });
/// # Ok(service)
/// # }
/// ```
pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, config: RequestConfig) -> Result<RequestConfig>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(RequestConfig) -> Result<RequestConfig> + Send + Sync,
{
    fn on_request(&self, config: RequestConfig) -> Result<RequestConfig> {
        self(config)
    }
}
