//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Seeding the frontier with start URLs
//! - Fetching batches of pages concurrently
//! - Feeding fetched pages through the spider one at a time
//! - Routing records to the output sink and follow requests to the frontier

use crate::config::Config;
use crate::crawler::scheduler::{QueueKind, QueuedRequest, Scheduler};
use crate::crawler::{FetchedPage, Fetcher, HttpFetcher, ResourceSpider, SpiderOutput};
use crate::mime::MimeTaxonomy;
use crate::output::{CrawlSummary, ResourceSink};
use crate::url::normalize_start_urls;
use crate::FetchError;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main crawler coordinator structure
pub struct Coordinator {
    spider: ResourceSpider,
    scheduler: Scheduler,
    fetcher: Box<dyn Fetcher>,
    start_urls: Vec<String>,
    summary: CrawlSummary,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `taxonomy` - The MIME taxonomy shared with the spider
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlerError)` - Invalid configuration or HTTP client failure
    pub fn new(config: &Config, taxonomy: Arc<MimeTaxonomy>) -> crate::Result<Self> {
        let fetcher = HttpFetcher::from_config(
            &config.user_agent,
            Duration::from_secs(config.crawler.request_timeout),
            config.crawler.max_redirects,
        )?;
        Self::with_fetcher(config, taxonomy, Box::new(fetcher))
    }

    /// Creates a coordinator over an arbitrary fetcher
    ///
    /// Start URLs are normalized, deduplicated and recorded as requested so
    /// that later links to them are not fetched again.
    pub fn with_fetcher(
        config: &Config,
        taxonomy: Arc<MimeTaxonomy>,
        fetcher: Box<dyn Fetcher>,
    ) -> crate::Result<Self> {
        let spider = ResourceSpider::from_config(config, taxonomy)?;
        let start_urls = normalize_start_urls(&config.start_urls)?;

        let mut frontier = Vec::with_capacity(start_urls.len());
        for url in &start_urls {
            if spider.state().requested.insert(url) {
                frontier.push(QueuedRequest::start(url.clone()));
            }
        }
        tracing::info!("Seeding frontier with {} start URLs", frontier.len());

        Ok(Self {
            spider,
            scheduler: Scheduler::new(&config.crawler, frontier),
            fetcher,
            start_urls,
            summary: CrawlSummary::new(),
        })
    }

    pub fn spider(&self) -> &ResourceSpider {
        &self.spider
    }

    pub fn start_urls(&self) -> &[String] {
        &self.start_urls
    }

    /// Runs the main crawl loop until the frontier is empty
    ///
    /// This method:
    /// 1. Takes the next batch from the scheduler
    /// 2. Fetches the whole batch concurrently
    /// 3. Skips failed fetches and non-success responses
    /// 4. Hands each page to the spider entry point matching its kind
    /// 5. Writes records to `sink` and queues follow requests
    ///
    /// # Errors
    ///
    /// Only output failures abort the crawl; fetch failures are counted and
    /// skipped.
    pub async fn run(&mut self, sink: &mut dyn ResourceSink) -> crate::Result<CrawlSummary> {
        tracing::info!(
            "Starting crawl for {} target types",
            self.spider.targets().len()
        );

        let start_time = Instant::now();
        let mut pages_processed: u64 = 0;

        loop {
            let batch = self.scheduler.next_batch();
            if batch.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            let fetcher: &dyn Fetcher = &*self.fetcher;
            let responses = join_all(batch.iter().map(|request| fetcher.get(&request.url))).await;

            for (request, response) in batch.into_iter().zip(responses) {
                let Some(page) = Self::accept(&mut self.summary, &request, response) else {
                    continue;
                };

                let output = match request.kind {
                    QueueKind::Start => self.spider.parse_start_url(&page, fetcher).await,
                    QueueKind::Page => self.spider.parse_link(&page, fetcher).await,
                    QueueKind::Sitemap => self.spider.parse_sitemap(&page),
                };

                for item in output {
                    match item {
                        SpiderOutput::Record(record) => {
                            self.summary.total_bytes += record.bytes.unwrap_or(0);
                            sink.write_record(&record)?;
                        }
                        SpiderOutput::Follow(follow) => {
                            self.scheduler.add_to_frontier(follow.into());
                        }
                    }
                }

                pages_processed += 1;
                if pages_processed % 10 == 0 {
                    let rate = pages_processed as f64 / start_time.elapsed().as_secs_f64();
                    tracing::info!(
                        "Progress: {} pages processed, {} in frontier, {} resources found, {:.2} pages/sec",
                        pages_processed,
                        self.scheduler.frontier_size(),
                        self.spider.state().found.len(),
                        rate
                    );
                }
            }
        }

        sink.finish()?;
        self.summary.finish(self.spider.state().snapshot());

        tracing::info!(
            "Crawl completed: {} pages processed in {:?}",
            pages_processed,
            start_time.elapsed()
        );

        Ok(self.summary.clone())
    }

    /// Keeps successful responses, counting everything else as failed
    fn accept(
        summary: &mut CrawlSummary,
        request: &QueuedRequest,
        response: Result<FetchedPage, FetchError>,
    ) -> Option<FetchedPage> {
        match response {
            Ok(page) if page.is_success() => Some(page),
            Ok(page) => {
                summary.pages_failed += 1;
                match request.kind {
                    QueueKind::Sitemap => {
                        tracing::debug!("No sitemap at {} (HTTP {})", request.url, page.status)
                    }
                    _ => tracing::warn!("Skipping {}: HTTP {}", request.url, page.status),
                }
                None
            }
            Err(e) => {
                summary.pages_failed += 1;
                tracing::debug!("Failed to fetch {}: {}", request.url, e);
                None
            }
        }
    }
}

/// Runs a complete crawl with the built-in taxonomy
///
/// # Example
///
/// ```no_run
/// use resource_crawler::config::load_config;
/// use resource_crawler::crawler::run_crawl;
/// use resource_crawler::output::MemorySink;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let mut sink = MemorySink::new();
/// let summary = run_crawl(&config, &mut sink).await?;
/// println!("{} resources", summary.resources_found);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    sink: &mut dyn ResourceSink,
) -> crate::Result<CrawlSummary> {
    let taxonomy = Arc::new(MimeTaxonomy::standard());
    let mut coordinator = Coordinator::new(config, taxonomy)?;
    coordinator.run(sink).await
}
