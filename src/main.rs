//! Resource Crawler main entry point
//!
//! This is the command-line interface for the resource crawler.

use anyhow::Context;
use clap::Parser;
use resource_crawler::config::{load_config_with_hash, validate, Config};
use resource_crawler::crawler::Coordinator;
use resource_crawler::mime::{MimeTaxonomy, TargetSet};
use resource_crawler::output::{print_summary, CsvSink};
use resource_crawler::url::{normalize_start_urls, DomainScope};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Resource Crawler: find downloadable resources on a website
///
/// Crawls from the given start URLs, classifies every discovered link by
/// MIME type, and writes the links matching the requested content types to
/// a CSV report with their size and referring page.
#[derive(Parser, Debug)]
#[command(name = "resource-crawler")]
#[command(version)]
#[command(about = "Find downloadable resources on a website", long_about = None)]
struct Cli {
    /// Start URLs; a bare host is crawled over http
    #[arg(value_name = "START_URLS")]
    start_urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Content type to report: extension (.pdf), MIME type (application/pdf),
    /// type group (image) or subtype (pdf); repeatable
    #[arg(short = 't', long = "content-type", value_name = "SPEC")]
    content_types: Vec<String>,

    /// Path of the CSV report
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Always probe with HEAD instead of guessing from URL extensions
    #[arg(long)]
    no_optimize: bool,

    /// Only inspect the start pages
    #[arg(long)]
    no_follow: bool,

    /// Follow links outside the start URLs' domains
    #[arg(long)]
    follow_external: bool,

    /// Also crawl /sitemap.xml of each start URL
    #[arg(long)]
    include_sitemap: bool,

    /// Maximum number of pages fetched concurrently
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resolve the content types and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply(&self, config: &mut Config) {
        if !self.start_urls.is_empty() {
            config.start_urls = self.start_urls.clone();
        }
        if !self.content_types.is_empty() {
            config.content_types = self.content_types.clone();
        }
        if let Some(output) = &self.output {
            config.output.csv_path = output.to_string_lossy().into_owned();
        }
        if self.no_optimize {
            config.crawler.optimize = false;
        }
        if self.no_follow {
            config.crawler.follow = false;
        }
        if self.follow_external {
            config.crawler.follow_external = true;
        }
        if self.include_sitemap {
            config.crawler.include_sitemap = true;
        }
        if let Some(concurrency) = self.concurrency {
            config.crawler.max_concurrent_fetches = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.request_timeout = timeout;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply(&mut config);
    validate(&config).context("Invalid configuration")?;

    let taxonomy = Arc::new(MimeTaxonomy::standard());
    tracing::debug!("MIME taxonomy holds {} extensions", taxonomy.extension_count());

    if cli.dry_run {
        return handle_dry_run(&config, &taxonomy);
    }

    handle_crawl(&config, taxonomy).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("resource_crawler=info,warn"),
            1 => EnvFilter::new("resource_crawler=debug,info"),
            2 => EnvFilter::new("resource_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: resolves targets and shows what would be crawled
fn handle_dry_run(config: &Config, taxonomy: &MimeTaxonomy) -> anyhow::Result<()> {
    let targets = TargetSet::resolve(&config.content_types, taxonomy)?;
    let start_urls = normalize_start_urls(&config.start_urls)?;
    let follow_external = config.crawler.follow && config.crawler.follow_external;
    let scope = DomainScope::from_start_urls(&start_urls, follow_external);

    println!("=== Resource Crawler Dry Run ===\n");

    println!("Start URLs ({}):", start_urls.len());
    for url in &start_urls {
        println!("  - {}", url);
    }

    println!("\nTarget MIME types ({}):", targets.len());
    for mime in targets.iter() {
        println!("  - {}", mime);
    }

    println!("\nCrawler Configuration:");
    println!("  Optimize: {}", config.crawler.optimize);
    println!("  Follow: {}", config.crawler.follow);
    println!("  Follow external: {}", follow_external);
    println!(
        "  Include sitemap: {}",
        config.crawler.follow && config.crawler.include_sitemap
    );
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Max redirects: {}", config.crawler.max_redirects);

    match scope.allowed_domains() {
        Some(domains) => {
            println!("\nAllowed domains ({}):", domains.len());
            for domain in domains {
                println!("  - {}", domain);
            }
        }
        None => println!("\nAllowed domains: any"),
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, taxonomy: Arc<MimeTaxonomy>) -> anyhow::Result<()> {
    tracing::info!(
        "Start URLs: {}, content types: {}",
        config.start_urls.len(),
        config.content_types.join(", ")
    );

    let mut coordinator = Coordinator::new(config, taxonomy)?;
    let mut sink = CsvSink::create(&config.output.csv_path)
        .with_context(|| format!("Failed to create {}", config.output.csv_path))?;

    match coordinator.run(&mut sink).await {
        Ok(summary) => {
            tracing::info!("Crawl completed successfully");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
