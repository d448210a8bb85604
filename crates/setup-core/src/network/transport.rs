//! HTTP transport for the release index.
//!
//! The trait seam lets tests script responses without network access; the
//! production implementation is a thin wrapper over `reqwest`.

use crate::config::NetworkConfig;
use crate::error::{Result, SetupError};
use async_trait::async_trait;
use reqwest::Client;

/// A fully drained HTTP response, reduced to the fields the fetcher inspects.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub status_text: String,
    pub retry_after: Option<String>,
    pub ratelimit_remaining: Option<String>,
    pub ratelimit_reset: Option<String>,
    pub body: String,
}

/// Transport for release-metadata requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and drain the response.
    ///
    /// # Errors
    ///
    /// Transport-level failures (connection, DNS, read) are fatal to the whole
    /// fetch and carry the underlying cause's message; they are never retried.
    async fn get(&self, url: &str) -> Result<WireResponse>;
}

/// Production transport backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(NetworkConfig::REQUEST_TIMEOUT)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| SetupError::Transport {
                url: NetworkConfig::GITHUB_API_BASE.to_string(),
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<WireResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SetupError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("unknown").to_string();
        let retry_after = header_string(&response, "retry-after");
        let ratelimit_remaining = header_string(&response, "x-ratelimit-remaining");
        let ratelimit_reset = header_string(&response, "x-ratelimit-reset");

        // Always read the body to completion; an unconsumed response would
        // strand the underlying connection.
        let body = response.text().await.map_err(|e| SetupError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(WireResponse {
            status: status.as_u16(),
            status_text,
            retry_after,
            ratelimit_remaining,
            ratelimit_reset,
            body,
        })
    }
}

fn header_string(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
