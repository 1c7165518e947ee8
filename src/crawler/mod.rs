//! Crawler module for page fetching and resource classification
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Link candidate extraction and sitemap reading
//! - MIME type resolution of discovered links
//! - The per-page spider and the crawl coordinator

mod coordinator;
mod fetcher;
mod parser;
mod resolver;
mod scheduler;
mod sitemap;
mod spider;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, is_markup, user_agent_string, FetchedPage, Fetcher, HeadResponse,
    HttpFetcher,
};
pub use parser::{extract_candidates, Candidates};
pub use resolver::{MimeResolver, Resolution};
pub use scheduler::{QueueKind, QueuedRequest, Scheduler};
pub use sitemap::{parse_sitemap_body, SitemapEntries};
pub use spider::{
    FollowRequest, PageOutput, RequestKind, ResourceSpider, SpiderOutput, SpiderSettings,
};
