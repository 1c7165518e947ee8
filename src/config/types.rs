use crate::mime::DEFAULT_CONTENT_TYPES;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for the resource crawler
///
/// Every section is optional in the TOML file; missing keys take their
/// defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed URLs; a bare host gets an `http://` prefix
    #[serde(rename = "start-urls")]
    pub start_urls: Vec<String>,

    /// Content type tokens: extensions, MIME types, type groups or subtypes
    #[serde(rename = "content-types")]
    pub content_types: Vec<String>,

    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,

    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_urls: Vec::new(),
            content_types: DEFAULT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Guess MIME types from URL extensions before probing with HEAD
    pub optimize: bool,

    /// Follow links found on crawled pages
    pub follow: bool,

    /// Follow links outside the start URLs' domains (requires `follow`)
    #[serde(rename = "follow-external")]
    pub follow_external: bool,

    /// Request `/sitemap.xml` of each start URL (requires `follow`)
    #[serde(rename = "include-sitemap")]
    pub include_sitemap: bool,

    /// Maximum number of pages fetched concurrently
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Maximum redirect hops per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            optimize: true,
            follow: true,
            follow_external: false,
            include_sitemap: false,
            max_concurrent_fetches: 8,
            request_timeout: 30,
            max_redirects: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ResourceCrawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV resource report
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

/// `$HOME/Desktop/resources.csv` when that directory exists, else
/// `resources.csv` in the working directory
pub fn default_csv_path() -> String {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join("Desktop"))
        .filter(|desktop| desktop.is_dir())
        .map(|desktop| desktop.join("resources.csv").to_string_lossy().into_owned())
        .unwrap_or_else(|| "resources.csv".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.start_urls.is_empty());
        assert_eq!(config.content_types, vec!["application/pdf"]);
        assert!(config.crawler.optimize);
        assert!(config.crawler.follow);
        assert!(!config.crawler.follow_external);
        assert!(!config.crawler.include_sitemap);
        assert_eq!(config.crawler.max_concurrent_fetches, 8);
        assert_eq!(config.user_agent.crawler_name, "ResourceCrawler");
        assert!(config.output.csv_path.ends_with("resources.csv"));
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.content_types, vec!["application/pdf"]);
        assert_eq!(config.crawler.request_timeout, 30);
    }

    #[test]
    fn test_partial_section() {
        let config: Config = toml::from_str(
            r#"
start-urls = ["example.com"]

[crawler]
follow-external = true
"#,
        )
        .unwrap();
        assert_eq!(config.start_urls, vec!["example.com"]);
        assert!(config.crawler.follow_external);
        assert!(config.crawler.follow);
        assert_eq!(config.crawler.max_redirects, 10);
    }
}
