//! Per-page orchestration: classify links, report resources, pick follows
//!
//! The spider never fetches pages itself. It receives fetched pages from the
//! coordinator and returns the records and follow requests each page yields.
//! HEAD probes for MIME resolution go through the `Fetcher` it is handed.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::parser::extract_candidates;
use crate::crawler::resolver::{MimeResolver, Resolution};
use crate::crawler::sitemap::parse_sitemap_body;
use crate::crawler::{FetchedPage, Fetcher};
use crate::mime::{bytes2human, MimeTaxonomy, TargetSet};
use crate::output::ResourceRecord;
use crate::state::CrawlState;
use crate::url::{is_ignorable, normalize_link, normalize_start_urls, sitemap_url};
use crate::url::{DomainScope, PageBase};
use crate::ConfigError;
use std::collections::HashSet;
use std::sync::Arc;

/// Behavior switches of a spider
///
/// `follow_external` and `include_sitemap` only take effect with `follow`;
/// the constructor folds that in so the fields can be read directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiderSettings {
    pub optimize: bool,
    pub follow: bool,
    pub follow_external: bool,
    pub include_sitemap: bool,
}

impl SpiderSettings {
    pub fn new(optimize: bool, follow: bool, follow_external: bool, include_sitemap: bool) -> Self {
        Self {
            optimize,
            follow,
            follow_external: follow && follow_external,
            include_sitemap: follow && include_sitemap,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.optimize,
            config.follow,
            config.follow_external,
            config.include_sitemap,
        )
    }
}

impl Default for SpiderSettings {
    fn default() -> Self {
        Self::new(true, true, false, false)
    }
}

/// What a follow request leads to once fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// A page handed back to [`ResourceSpider::parse_link`]
    Page,
    /// A sitemap handed back to [`ResourceSpider::parse_sitemap`]
    Sitemap,
}

/// A URL the coordinator should fetch next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowRequest {
    pub url: String,
    pub kind: RequestKind,
}

impl FollowRequest {
    pub fn page(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: RequestKind::Page,
        }
    }

    pub fn sitemap(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: RequestKind::Sitemap,
        }
    }
}

/// One item of spider output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpiderOutput {
    Record(ResourceRecord),
    Follow(FollowRequest),
}

/// Everything one page yields
///
/// Iteration order: the sitemap request (start pages only), then records,
/// then follow requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOutput {
    pub sitemap: Option<FollowRequest>,
    pub records: Vec<ResourceRecord>,
    pub follows: Vec<FollowRequest>,
}

impl PageOutput {
    pub fn is_empty(&self) -> bool {
        self.sitemap.is_none() && self.records.is_empty() && self.follows.is_empty()
    }

    pub fn len(&self) -> usize {
        usize::from(self.sitemap.is_some()) + self.records.len() + self.follows.len()
    }
}

impl IntoIterator for PageOutput {
    type Item = SpiderOutput;
    type IntoIter = std::vec::IntoIter<SpiderOutput>;

    fn into_iter(self) -> Self::IntoIter {
        let mut items = Vec::with_capacity(self.len());
        items.extend(self.sitemap.map(SpiderOutput::Follow));
        items.extend(self.records.into_iter().map(SpiderOutput::Record));
        items.extend(self.follows.into_iter().map(SpiderOutput::Follow));
        items.into_iter()
    }
}

/// The crawl-and-classify engine
///
/// Owns the target set, the domain scope, the MIME resolver and the crawl's
/// dedup state. Pages are processed one at a time.
#[derive(Debug)]
pub struct ResourceSpider {
    settings: SpiderSettings,
    targets: TargetSet,
    scope: DomainScope,
    resolver: MimeResolver,
    state: CrawlState,
}

impl ResourceSpider {
    pub fn new(
        settings: SpiderSettings,
        targets: TargetSet,
        scope: DomainScope,
        taxonomy: Arc<MimeTaxonomy>,
    ) -> Self {
        Self {
            settings,
            targets,
            scope,
            resolver: MimeResolver::new(taxonomy),
            state: CrawlState::new(),
        }
    }

    /// Builds a spider from configuration
    ///
    /// # Errors
    ///
    /// * `ConfigError::UnknownContentType` - a content type token does not resolve
    /// * `ConfigError::InvalidUrl` - a start URL cannot be normalized
    pub fn from_config(config: &Config, taxonomy: Arc<MimeTaxonomy>) -> Result<Self, ConfigError> {
        let settings = SpiderSettings::from_config(&config.crawler);
        let targets = TargetSet::resolve(&config.content_types, &taxonomy)?;
        let start_urls = normalize_start_urls(&config.start_urls)
            .map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        let scope = DomainScope::from_start_urls(&start_urls, settings.follow_external);

        Ok(Self::new(settings, targets, scope, taxonomy))
    }

    pub fn settings(&self) -> &SpiderSettings {
        &self.settings
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    pub fn scope(&self) -> &DomainScope {
        &self.scope
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Handles the first response of a start URL
    ///
    /// With sitemap inclusion enabled, `/sitemap.xml` on the page's network
    /// location is requested ahead of the page's own output, once per crawl.
    pub async fn parse_start_url(&self, page: &FetchedPage, fetcher: &dyn Fetcher) -> PageOutput {
        let mut sitemap = None;
        if self.settings.include_sitemap {
            let url = sitemap_url(&page.url);
            if self.state.seen.insert(&url) {
                tracing::debug!("Requesting sitemap {}", url);
                sitemap = Some(FollowRequest::sitemap(url));
            }
        }

        let mut output = self.parse_link(page, fetcher).await;
        output.sitemap = sitemap;
        output
    }

    /// Processes one fetched page
    ///
    /// # Processing Steps
    ///
    /// 1. Skip pages already parsed
    /// 2. Extract `[src]` then `[href]` candidates
    /// 3. For each candidate: skip ignorable links, normalize, resolve the
    ///    MIME type the first time the URL is seen, report it when it matches
    ///    the target set and has not been reported
    /// 4. A link that came from an `href`, or whose normalized form contains
    ///    any raw `href` of the page, becomes a follow candidate, whatever its
    ///    MIME type
    /// 5. Follow candidates within scope and not yet requested become follow
    ///    requests
    pub async fn parse_link(&self, page: &FetchedPage, fetcher: &dyn Fetcher) -> PageOutput {
        let page_url = page.url.to_string();
        if !self.state.parsed.insert(&page_url) {
            tracing::debug!("Already parsed {}", page_url);
            return PageOutput::default();
        }

        let candidates = extract_candidates(&page.body, &page.content_type);
        let base = PageBase::from_url(&page.url);
        let hrefs: Vec<&str> = candidates
            .hrefs
            .iter()
            .map(|href| href.trim())
            .filter(|href| !href.is_empty())
            .collect();
        let href_urls: HashSet<String> = hrefs
            .iter()
            .filter(|href| !is_ignorable(href))
            .filter_map(|href| normalize_link(href, &base))
            .collect();

        tracing::trace!("{} candidates on {}", candidates.len(), page_url);

        let mut output = PageOutput::default();
        let mut follow_candidates = Vec::new();
        let mut follow_seen = HashSet::new();

        for raw in candidates.all() {
            let link = raw.trim();
            if link.is_empty() || is_ignorable(link) {
                continue;
            }
            let Some(url) = normalize_link(link, &base) else {
                continue;
            };

            if self.state.seen.insert(&url) {
                let resolution = self
                    .resolver
                    .resolve(fetcher, &url, self.settings.optimize)
                    .await;
                if let Some(record) = self.report(&url, resolution, &page_url) {
                    output.records.push(record);
                }
            }

            if self.settings.follow
                && (href_urls.contains(&url) || hrefs.iter().any(|href| url.contains(href)))
                && follow_seen.insert(url.clone())
            {
                follow_candidates.push(url);
            }
        }

        for url in follow_candidates {
            if self.scope.is_allowed(&url) && self.state.requested.insert(&url) {
                output.follows.push(FollowRequest::page(url));
            }
        }

        output
    }

    /// Processes a fetched sitemap
    ///
    /// Page entries become page follow requests (deduplicated through
    /// `requested`, filtered by scope); sitemap index entries become sitemap
    /// follow requests (deduplicated through `seen`).
    pub fn parse_sitemap(&self, page: &FetchedPage) -> PageOutput {
        let entries = parse_sitemap_body(&page.body);
        let base = PageBase::from_url(&page.url);
        let mut output = PageOutput::default();

        tracing::debug!(
            "Sitemap {} lists {} pages and {} sitemaps",
            page.url,
            entries.pages.len(),
            entries.sitemaps.len()
        );

        for loc in &entries.pages {
            let Some(url) = normalize_link(loc, &base) else {
                continue;
            };
            if self.scope.is_allowed(&url) && self.state.requested.insert(&url) {
                output.follows.push(FollowRequest::page(url));
            }
        }

        for loc in &entries.sitemaps {
            let Some(url) = normalize_link(loc, &base) else {
                continue;
            };
            if self.scope.is_allowed(&url) && self.state.seen.insert(&url) {
                output.follows.push(FollowRequest::sitemap(url));
            }
        }

        output
    }

    /// Builds a record when the resolved type is a new match
    fn report(&self, url: &str, resolution: Resolution, referrer: &str) -> Option<ResourceRecord> {
        let mimetype = resolution.mimetype?;
        if !self.targets.matches(&mimetype) || !self.state.found.insert(url) {
            return None;
        }

        let size = resolution.size.map(bytes2human);
        let ordinal = self.state.found.len();
        if ordinal == 1 {
            tracing::info!(
                "{:>5} {:<16} {:<8} {:<64}",
                "COUNT",
                "MIMETYPE",
                "SIZE",
                "REFERRER"
            );
        }
        tracing::info!(
            "{:>4}: {:<16} {:<8} {:<64}",
            ordinal,
            mimetype,
            size.as_deref().unwrap_or("-"),
            url
        );

        Some(ResourceRecord {
            url: url.to_string(),
            mimetype,
            size,
            referrer: referrer.to_string(),
            bytes: resolution.size,
        })
    }
}
