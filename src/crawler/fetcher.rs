//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured timeout
//! - Per-request headers with a rotated user agent
//! - GET requests returning the body and response metadata
//! - Error classification (timeout, non-2xx status, transport failure)
//!
//! There is no retry at this layer: a failed fetch is final for the run.

use crate::config::CrawlConfig;
use crate::crawler::user_agent::{RandomSelector, UserAgentSelector};
use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Page body content
    pub body: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, empty when absent
    pub content_type: String,
}

/// Why a fetch failed
///
/// The `Display` form is the human-readable reason recorded for the URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {cause}")]
    Transport { url: String, cause: String },

    #[error("failed to read body of {url}: {cause}")]
    Body { url: String, cause: String },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Status { url, .. }
            | Self::Transport { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Retrieves a single page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with the given per-request timeout
///
/// Redirects are followed with reqwest's default policy and plain http is
/// allowed.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the request headers for one request
pub fn request_headers(user_agent: &str) -> Result<HeaderMap, String> {
    let mut headers = HeaderMap::new();
    let agent = HeaderValue::from_str(user_agent)
        .map_err(|e| format!("invalid user agent '{}': {}", user_agent, e))?;

    headers.insert(USER_AGENT, agent);
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    Ok(headers)
}

/// [`PageFetcher`] backed by `reqwest`
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
    selector: Box<dyn UserAgentSelector>,
}

impl HttpFetcher {
    /// Creates a fetcher that picks user agents at random
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        Self::with_selector(config, Box::new(RandomSelector))
    }

    /// Creates a fetcher with a custom user agent selection strategy
    pub fn with_selector(
        config: &CrawlConfig,
        selector: Box<dyn UserAgentSelector>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config.request_timeout())?,
            user_agents: config.user_agents().to_vec(),
            selector,
        })
    }

    fn headers_for(&self, url: &Url) -> Result<HeaderMap, FetchError> {
        let agent = self
            .selector
            .select(&self.user_agents)
            .ok_or_else(|| FetchError::Transport {
                url: url.to_string(),
                cause: "user agent pool is empty".to_string(),
            })?;

        request_headers(agent).map_err(|cause| FetchError::Transport {
            url: url.to_string(),
            cause,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let headers = self.headers_for(url)?;

        let response = match self.client.get(url.as_str()).headers(headers).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                })
            }
            Err(e) => {
                return Err(FetchError::Transport {
                    url: url.to_string(),
                    cause: e.to_string(),
                })
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    cause: e.to_string(),
                }
            }
        })?;

        Ok(FetchedPage {
            body,
            status_code: status.as_u16(),
            content_type,
        })
    }
}
