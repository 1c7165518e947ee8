//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - HEAD requests to probe Content-Type and Content-Length
//! - Manual redirect handling that keeps the request method
//! - Error classification

use crate::config::UserAgentConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Method, Response};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// A fetched page: final URL after redirects, status, and body
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, empty when absent
    pub content_type: String,
    /// Page body; empty for binary content types
    pub body: String,
}

impl FetchedPage {
    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Headers of a HEAD probe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResponse {
    pub status: u16,
    pub content_type: Option<String>,
    /// Parsed Content-Length; `None` when absent or unparsable
    pub content_length: Option<u64>,
}

/// Transport used by the crawler
///
/// A transport failure is an `Err`; a response that lacks a header is still
/// `Ok`. Uses `async_trait` so coordinators can hold a `Box<dyn Fetcher>`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a page with GET, following redirects
    async fn get(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// Probes a URL with HEAD, following redirects as HEAD
    async fn head(&self, url: &str) -> Result<HeadResponse, FetchError>;
}

/// Builds the user agent string: `Name/Version (+ContactURL)`
///
/// The contact part is omitted when no contact URL is configured.
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are disabled on the client and handled by [`HttpFetcher`].
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total request timeout
///
/// # Example
///
/// ```no_run
/// use resource_crawler::config::UserAgentConfig;
/// use resource_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "ResourceCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: Some("https://example.com/about".to_string()),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// `reqwest`-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_redirects: u32,
}

impl HttpFetcher {
    pub fn new(client: Client, max_redirects: u32) -> Self {
        Self {
            client,
            max_redirects,
        }
    }

    /// Builds a fetcher with a fresh client
    pub fn from_config(
        config: &UserAgentConfig,
        timeout: Duration,
        max_redirects: u32,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?, max_redirects))
    }

    /// Sends a request and follows redirects with the same method
    ///
    /// # Redirect Handling
    ///
    /// - A 3xx response with a `Location` header is followed
    /// - More than `max_redirects` hops → `FetchError::RedirectLimit`
    /// - Revisiting a URL in the chain → `FetchError::RedirectLoop`
    /// - A 3xx response without `Location` is returned as-is
    async fn send(&self, method: Method, url: &str) -> Result<Response, FetchError> {
        let mut current = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let mut visited = HashSet::new();
        visited.insert(current.to_string());
        let mut hops = 0;

        loop {
            let response = self
                .client
                .request(method.clone(), current.clone())
                .send()
                .await
                .map_err(|e| classify_error(current.as_str(), e))?;

            if !response.status().is_redirection() {
                return Ok(response);
            }

            let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
            else {
                return Ok(response);
            };

            let next = current.join(location).map_err(|e| FetchError::InvalidUrl {
                url: location.to_string(),
                message: e.to_string(),
            })?;

            hops += 1;
            if hops > self.max_redirects {
                return Err(FetchError::RedirectLimit {
                    url: url.to_string(),
                });
            }
            if !visited.insert(next.to_string()) {
                return Err(FetchError::RedirectLoop {
                    url: next.to_string(),
                });
            }

            tracing::trace!("{} {} redirected to {}", method, current, next);
            current = next;
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.send(Method::GET, url).await?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = header_string(&response, CONTENT_TYPE).unwrap_or_default();

        let body = if is_markup(&content_type) {
            response.text().await.map_err(|e| FetchError::Http {
                url: final_url.to_string(),
                source: e,
            })?
        } else {
            String::new()
        };

        Ok(FetchedPage {
            url: final_url,
            status,
            content_type,
            body,
        })
    }

    async fn head(&self, url: &str) -> Result<HeadResponse, FetchError> {
        let response = self.send(Method::HEAD, url).await?;

        Ok(HeadResponse {
            status: response.status().as_u16(),
            content_type: header_string(&response, CONTENT_TYPE),
            content_length: header_string(&response, CONTENT_LENGTH)
                .and_then(|value| value.trim().parse().ok()),
        })
    }
}

/// Returns true when a body of this content type may contain links
///
/// An absent Content-Type is treated as markup.
pub fn is_markup(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.is_empty()
        || content_type.starts_with("text/")
        || content_type.contains("html")
        || content_type.contains("xml")
}

fn header_string(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Maps a `reqwest` error onto `FetchError`
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
