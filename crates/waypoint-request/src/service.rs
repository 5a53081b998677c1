//! Request service

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::{RequestConfig, RequestOptions};
use crate::error::RequestError;
use crate::interceptor::RequestInterceptor;
use crate::Result;

/// Configured request-sending function
///
/// Callers get the response payload or the failure of whichever stage
/// produced it; status line and headers never reach them.
#[derive(Clone)]
pub struct RequestService {
    client: Client,
    base_url: Url,
    timeout: Duration,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl RequestService {
    pub fn new(options: RequestOptions) -> Result<Self> {
        let base_url = Url::parse(options.base_url.trim()).map_err(RequestError::InvalidBaseUrl)?;
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(RequestError::Build)?;

        Ok(Self {
            client,
            base_url,
            timeout: options.timeout,
            interceptors: Vec::new(),
        })
    }

    /// Append an outbound interceptor; they run in registration order
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request(RequestConfig::get(url)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.request(RequestConfig::delete(url)).await
    }

    pub async fn post<T, B>(&self, url: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestConfig::post(url).json(body)?).await
    }

    pub async fn put<T, B>(&self, url: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestConfig::put(url).json(body)?).await
    }

    pub async fn patch<T, B>(&self, url: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(RequestConfig::patch(url).json(body)?).await
    }

    /// Send a request and return its payload
    pub async fn request<T: DeserializeOwned>(&self, config: RequestConfig) -> Result<T> {
        let request = self.prepare(config).inspect_err(|err| {
            tracing::debug!(error = %err, "Request preparation failed");
        })?;

        tracing::debug!(method = %request.method(), url = %request.url(), "Sending request");

        let response = self.client.execute(request).await.inspect_err(|err| {
            tracing::debug!(error = %err, "Request failed");
        })?;

        unwrap_payload(response).await
    }

    /// Outbound stage
    fn prepare(&self, config: RequestConfig) -> Result<reqwest::Request> {
        let config = self
            .interceptors
            .iter()
            .try_fold(config, |config, interceptor| interceptor.on_request(config))?;

        let url = self.resolve_url(&config.url)?;
        let mut builder = self
            .client
            .request(config.method, url)
            .timeout(config.timeout.unwrap_or(self.timeout));

        for (name, value) in &config.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| RequestError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| RequestError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            builder = builder.header(header_name, header_value);
        }

        if !config.params.is_empty() {
            builder = builder.query(&config.params);
        }

        if let Some(body) = &config.body {
            builder = builder.json(body);
        }

        builder.build().map_err(RequestError::Build)
    }

    /// Absolute URLs are used as given; anything else is joined onto the base
    fn resolve_url(&self, url: &str) -> Result<Url> {
        let combined = if url.starts_with("//") {
            format!("{}:{}", self.base_url.scheme(), url)
        } else if is_absolute_url(url) {
            url.to_string()
        } else if url.is_empty() {
            self.base_url.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.as_str().trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        };

        Url::parse(&combined).map_err(|source| RequestError::InvalidUrl {
            url: combined,
            source,
        })
    }
}

impl std::fmt::Debug for RequestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestService")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

/// Inbound stage
async fn unwrap_payload<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = response.error_for_status()?;
    let status = response.status();
    let body = response.bytes().await?;

    tracing::debug!(%status, bytes = body.len(), "Response received");

    decode_payload(&body)
}

/// Empty bodies decode as `null`; bodies that are not JSON are offered to
/// the caller as a plain string.
fn decode_payload<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }

    match serde_json::from_slice(body) {
        Ok(payload) => Ok(payload),
        Err(err) => {
            let text = String::from_utf8_lossy(body).into_owned();
            serde_json::from_value(Value::String(text)).map_err(|_| err.into())
        }
    }
}

/// `scheme://...` or protocol-relative `//...`
fn is_absolute_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }

    match url.find("://") {
        Some(idx) => {
            let scheme = &url[..idx];
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
