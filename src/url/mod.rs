//! URL handling module
//!
//! This module provides link normalization against a referring page, start URL
//! normalization, and the domain scope guard that decides what may be followed.

mod normalize;
mod scope;

use crate::{UrlError, UrlResult};
use std::collections::HashSet;
use url::Url;

// Re-export main functions
pub use normalize::{is_ignorable, normalize_link, PageBase};
pub use scope::{bare_domain, DomainScope};

/// Returns the network location of a URL: host plus explicit port
///
/// # Examples
///
/// ```
/// use url::Url;
/// use resource_crawler::url::netloc;
///
/// assert_eq!(netloc(&Url::parse("http://Example.com/x").unwrap()), "example.com");
/// assert_eq!(netloc(&Url::parse("http://localhost:3000/").unwrap()), "localhost:3000");
/// ```
pub fn netloc(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Normalizes a user-supplied start URL
///
/// Surrounding whitespace is trimmed and `http://` is prepended unless the URL
/// already starts with `http://` or `https://`.
///
/// # Errors
///
/// Returns `UrlError` when the result does not parse or has no host.
///
/// # Examples
///
/// ```
/// use resource_crawler::url::normalize_start_url;
///
/// assert_eq!(normalize_start_url(" example.com ").unwrap(), "http://example.com/");
/// assert_eq!(
///     normalize_start_url("https://example.com/docs").unwrap(),
///     "https://example.com/docs"
/// );
/// ```
pub fn normalize_start_url(raw: &str) -> UrlResult<String> {
    let raw = raw.trim();
    let candidate = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }
    Ok(url.to_string())
}

/// Normalizes and deduplicates start URLs, keeping first-seen order
pub fn normalize_start_urls<S: AsRef<str>>(raw: &[S]) -> UrlResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for url in raw {
        let normalized = normalize_start_url(url.as_ref())?;
        if seen.insert(normalized.clone()) {
            urls.push(normalized);
        }
    }
    Ok(urls)
}

/// Returns the `/sitemap.xml` URL on the same scheme and network location
pub fn sitemap_url(url: &Url) -> String {
    format!("{}://{}/sitemap.xml", url.scheme(), netloc(url))
}
