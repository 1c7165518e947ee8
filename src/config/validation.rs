use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::normalize_start_url;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration, start URLs included
///
/// Run this once CLI overrides have been merged in.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_start_urls(&config.start_urls)?;
    validate_settings(config)
}

/// Validates everything except the presence of start URLs
///
/// Start URLs may still come from the command line, so a configuration file
/// without any is accepted here.
pub fn validate_settings(config: &Config) -> ConfigResult<()> {
    for url in &config.start_urls {
        validate_start_url(url)?;
    }
    validate_content_types(&config.content_types)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_start_urls(urls: &[String]) -> ConfigResult<()> {
    if urls.is_empty() {
        return Err(ConfigError::Validation(
            "at least one start URL is required".to_string(),
        ));
    }
    Ok(())
}

fn validate_start_url(url: &str) -> ConfigResult<()> {
    normalize_start_url(url)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", url, e)))
}

fn validate_content_types(content_types: &[String]) -> ConfigResult<()> {
    if content_types.is_empty() {
        return Err(ConfigError::Validation(
            "content_types cannot be empty".to_string(),
        ));
    }

    if content_types.iter().any(|token| token.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "content_types cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.max_redirects > 50 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 50, got {}",
            config.max_redirects
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.csv_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
