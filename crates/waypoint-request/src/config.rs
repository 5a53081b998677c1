//! Request configuration

use std::time::Duration;

use reqwest::Method;
use serde::Serialize;

use crate::error::RequestError;

/// Timeout ceiling applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(35_000);

/// Service-wide options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Base address relative request paths are resolved against
    pub base_url: String,
    pub timeout: Duration,
}

impl RequestOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// One outbound call
///
/// Headers are kept as raw strings and validated when the request is
/// prepared, so a bad header surfaces as a preparation failure.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    /// Path relative to the base address, or an absolute URL
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Overrides the service timeout for this call
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> crate::Result<Self> {
        self.body = Some(serde_json::to_value(body).map_err(RequestError::Encode)?);
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
