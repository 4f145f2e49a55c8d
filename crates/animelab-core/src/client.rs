//! HTTP client shared by stream services
//!
//! The client never hands errors to its callers. Transport failures, non-2xx
//! answers and undecodable bodies are logged and reported as `None`, which
//! lets services treat every failure as "nothing fetched".

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, error};

use crate::config::ProxyAddress;
use crate::error::{Result, StreamServiceError};

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// How the response body should be handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Decode the body as JSON
    Json,
    /// Return the raw body text
    Text,
}

/// A successfully fetched response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// The decoded JSON value, if this body was requested as JSON
    pub fn into_json(self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// The raw text, if this body was requested as text
    pub fn into_text(self) -> Option<String> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Retries after a 5xx answer (default: 2)
    pub max_retries: u32,
    /// Base delay for exponential backoff in milliseconds (default: 1000)
    pub retry_delay_ms: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
            retry_delay_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// HTTP client with optional per-request proxy and retry on server errors
///
/// Proxied requests go through a dedicated reqwest client per proxy address,
/// built on first use and reused afterwards.
pub struct ServiceClient {
    /// Client for direct requests
    client: reqwest::Client,
    /// Clients routed through a proxy, keyed by address
    proxied: Mutex<HashMap<ProxyAddress, reqwest::Client>>,
    config: ClientConfig,
}

impl ServiceClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = Self::build_client(&config, None)?;

        Ok(Self {
            client,
            proxied: Mutex::new(HashMap::new()),
            config,
        })
    }

    fn build_client(config: &ClientConfig, proxy: Option<&ProxyAddress>) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.to_url())?);
        }

        Ok(builder.build()?)
    }

    /// Pick the client for a request, building the proxied one if needed
    async fn client_for(&self, proxy: Option<&ProxyAddress>) -> Result<reqwest::Client> {
        let Some(proxy) = proxy else {
            return Ok(self.client.clone());
        };

        let mut proxied = self.proxied.lock().await;
        if let Some(client) = proxied.get(proxy) {
            return Ok(client.clone());
        }

        debug!(proxy = %proxy, "Building proxied HTTP client");
        let client = Self::build_client(&self.config, Some(proxy))?;
        proxied.insert(proxy.clone(), client.clone());
        Ok(client)
    }

    /// Perform a GET request
    ///
    /// # Arguments
    /// * `url` - Absolute URL to fetch
    /// * `proxy` - Proxy to route the request through, if any
    /// * `kind` - Whether to decode the body as JSON or return it as text
    ///
    /// # Returns
    /// The response body, or `None` if the request failed for any reason.
    /// Failures are logged at error level.
    pub async fn request(
        &self,
        url: &str,
        proxy: Option<&ProxyAddress>,
        kind: ResponseKind,
    ) -> Option<ResponseBody> {
        match self.fetch(url, proxy, kind).await {
            Ok(body) => Some(body),
            Err(e) => {
                error!(url, error = %e, "Request failed");
                None
            }
        }
    }

    async fn fetch(
        &self,
        url: &str,
        proxy: Option<&ProxyAddress>,
        kind: ResponseKind,
    ) -> Result<ResponseBody> {
        let client = self.client_for(proxy).await?;
        let mut attempt = 0;

        loop {
            debug!(url, attempt, "Sending request");
            let response = client.get(url).send().await?;
            let status = response.status();

            if status.is_success() {
                let body = response.text().await?;
                return match kind {
                    ResponseKind::Json => Ok(ResponseBody::Json(serde_json::from_str(&body)?)),
                    ResponseKind::Text => Ok(ResponseBody::Text(body)),
                };
            }

            // Server errors are retried with backoff, everything else fails immediately
            if status.is_server_error() && attempt < self.config.max_retries {
                let delay = self.calculate_backoff_delay(attempt);
                debug!(url, status = status.as_u16(), ?delay, "Retrying after server error");
                sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(StreamServiceError::UnexpectedStatus(status.as_u16()));
        }
    }

    /// Calculate exponential backoff delay for retry
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: 1x, 2x, 4x, ... saturating at u64::MAX
        let delay_ms = 2u64
            .checked_pow(attempt)
            .map_or(u64::MAX, |factor| self.config.retry_delay_ms.saturating_mul(factor));
        Duration::from_millis(delay_ms)
    }
}
