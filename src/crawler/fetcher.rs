//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's identifying user agent
//! - Timeout-bounded GET requests for sitemaps and content pages
//! - Error classification (status, timeout, network)
//!
//! Every call is independent: there are no retries, and a failure only ever
//! concerns the one URL that was requested.

use crate::config::UserAgentConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// `Accept` header favoring HTML, then XML
pub const ACCEPT_HEADER: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Maximum redirect hops followed before a request fails
pub const MAX_REDIRECTS: usize = 10;

/// Default timeout for sitemap requests
pub const SITEMAP_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for content page requests
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors raised while fetching a single URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Fetch failed ({status}) for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

impl FetchError {
    /// The URL the failed request was made for
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Network { url, .. } => url,
        }
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_corpus::config::UserAgentConfig;
/// use site_corpus::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "SiteCorpus".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));

    // Timeouts are set per request; sitemaps and pages use different budgets
    Client::builder()
        .user_agent(config.header_value())
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches documents over HTTP with a per-request deadline
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Wraps an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher whose client identifies itself with `config`
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches a URL and returns its body as text
    ///
    /// # Request Flow
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | URL does not parse | `InvalidUrl` |
    /// | 2xx after redirects | body text |
    /// | Any other status | `Status` |
    /// | Deadline exceeded (headers or body) | `Timeout` |
    /// | Connection, TLS, redirect or body error | `Network` |
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `timeout` - Deadline covering the whole request, body included
    pub async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if response.url().as_str() != url {
            tracing::trace!("{} redirected to {}", url, response.url());
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))
    }
}
