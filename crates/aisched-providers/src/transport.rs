//! HTTP transport for provider requests.
//!
//! The transport sends a [`ProviderRequest`] verbatim and returns the decoded
//! JSON body. Vendor error bodies are returned as-is, even on non-2xx status,
//! so the adapter's credential check can see them.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::adapter::vendor_error;
use crate::error::{ProviderError, ProviderResult};
use crate::request::ProviderRequest;

/// A boxed future for async trait methods.
///
/// Keeps [`Transport`] object-safe so callers can hold a `&dyn Transport`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sends one request and returns the response body.
pub trait Transport: Send + Sync {
    /// Performs the request. No retries.
    fn send<'a>(&'a self, request: &'a ProviderRequest) -> BoxFuture<'a, ProviderResult<Value>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with the given request timeout.
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("aisched/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;
        Ok(Self { http_client })
    }

    fn prepare(&self, request: &ProviderRequest) -> ProviderResult<reqwest::RequestBuilder> {
        let method = reqwest::Method::from_bytes(request.options.method.as_bytes())
            .map_err(|e| ProviderError::internal(format!("invalid HTTP method: {}", e)))?;

        debug!(
            endpoint = %request.redacted_endpoint(),
            method = %method,
            "sending provider request"
        );

        let mut builder = self.http_client.request(method, &request.endpoint);
        for (name, value) in &request.options.headers {
            builder = builder.header(name, value);
        }
        Ok(builder.json(&request.options.body))
    }

    async fn execute(&self, request: &ProviderRequest) -> ProviderResult<Value> {
        let builder = self.prepare(request)?;

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::network("request timed out").with_source(e)
            } else if e.is_connect() {
                ProviderError::network("connection failed").with_source(e)
            } else {
                ProviderError::network(format!("request failed: {}", e)).with_source(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e)).with_source(e)
        })?;

        match serde_json::from_str::<Value>(&body) {
            Ok(value) if status.is_success() || vendor_error(&value).is_some() => {
                debug!(status = %status, "provider responded");
                Ok(value)
            }
            Err(e) if status.is_success() => Err(ProviderError::invalid_response(format!(
                "response is not JSON: {}",
                e
            ))
            .with_source(e)),
            _ => {
                warn!(status = %status, "provider returned an error without a JSON error body");
                Err(ProviderError::server(format!("HTTP {}: {}", status, truncate(&body))))
            }
        }
    }
}

fn truncate(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

impl Transport for HttpTransport {
    fn send<'a>(&'a self, request: &'a ProviderRequest) -> BoxFuture<'a, ProviderResult<Value>> {
        Box::pin(self.execute(request))
    }
}
