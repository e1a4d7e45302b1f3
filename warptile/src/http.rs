//! HTTP client abstraction for testability

use bytes::Bytes;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::error::TileError;

/// An HTTP response as seen by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code
    pub status: u16,
    /// Reason phrase, e.g. "Not Found" (may be empty)
    pub status_text: String,
    /// Response body; empty for non-success responses
    pub body: Bytes,
}

impl HttpResponse {
    /// A 200 OK response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    /// A bodiless response with the given status.
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: Bytes::new(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for asynchronous HTTP client operations.
///
/// The fetcher is generic over this trait so tests can inject a mock client.
/// Implementations return `Ok` for every response that arrived, whatever its
/// status; `Err` is reserved for transport failures.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, TileError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a client with the given User-Agent and optional timeout.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, TileError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            TileError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TileError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(TileError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();

        // Failed responses are reported without reading the body
        if !status.is_success() {
            return Ok(HttpResponse {
                status: status.as_u16(),
                status_text,
                body: Bytes::new(),
            });
        }

        match response.bytes().await {
            Ok(body) => {
                trace!(url = url, bytes = body.len(), "HTTP response body read");
                Ok(HttpResponse {
                    status: status.as_u16(),
                    status_text,
                    body,
                })
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(TileError::Transport {
                    url: url.to_string(),
                    message: format!("Failed to read response: {}", e),
                })
            }
        }
    }
}
