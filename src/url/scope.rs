use std::collections::BTreeSet;
use url::Url;

use super::netloc;

/// Decides which discovered URLs may be followed
///
/// Holds the bare network locations of the start URLs (leading `www.`
/// stripped). Matching is deliberately permissive: a URL is in scope when its
/// text contains any allowed domain, which also admits subdomains, and any
/// URL whose path or query happens to mention an allowed domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainScope {
    /// `None` when external following is enabled
    allowed: Option<BTreeSet<String>>,
}

impl DomainScope {
    /// Builds the scope from normalized start URLs
    ///
    /// With `follow_external` every URL is in scope. Start URLs that cannot be
    /// parsed contribute no domain.
    ///
    /// # Examples
    ///
    /// ```
    /// use resource_crawler::url::DomainScope;
    ///
    /// let scope = DomainScope::from_start_urls(&["http://www.example.com/"], false);
    /// assert!(scope.is_allowed("http://example.com/docs"));
    /// assert!(scope.is_allowed("https://cdn.example.com/x.pdf"));
    /// assert!(!scope.is_allowed("http://other.com/x"));
    /// ```
    pub fn from_start_urls<S: AsRef<str>>(start_urls: &[S], follow_external: bool) -> Self {
        if follow_external {
            return Self::unrestricted();
        }

        let allowed = start_urls
            .iter()
            .filter_map(|url| Url::parse(url.as_ref()).ok())
            .map(|url| bare_domain(&netloc(&url)).to_string())
            .filter(|domain| !domain.is_empty())
            .collect();

        Self {
            allowed: Some(allowed),
        }
    }

    /// A scope that admits every URL
    pub fn unrestricted() -> Self {
        Self { allowed: None }
    }

    /// Returns true if `url` may be followed
    ///
    /// True when unrestricted, when no domain is configured, or when the URL
    /// text contains an allowed domain.
    pub fn is_allowed(&self, url: &str) -> bool {
        match &self.allowed {
            None => true,
            Some(domains) if domains.is_empty() => true,
            Some(domains) => domains.iter().any(|domain| url.contains(domain.as_str())),
        }
    }

    /// The allowed domains, or `None` when unrestricted
    pub fn allowed_domains(&self) -> Option<&BTreeSet<String>> {
        self.allowed.as_ref()
    }
}

/// Strips a leading `www.` from a network location
pub fn bare_domain(netloc: &str) -> &str {
    netloc.strip_prefix("www.").unwrap_or(netloc)
}
