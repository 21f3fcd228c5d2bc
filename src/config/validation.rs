use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use scraper::Selector;

const MAX_PARALLELISM: u32 = 100;
const MAX_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
///
/// Seed URLs are checked by [`crate::url::validate_urls`], not here.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.parallelism < 1 || config.parallelism > MAX_PARALLELISM {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM, config.parallelism
        )));
    }

    if config.delay_ms > MAX_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "delay-ms must be <= {}ms, got {}ms",
            MAX_DELAY_MS, config.delay_ms
        )));
    }

    if config.random_delay_ms > MAX_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "random-delay-ms must be <= {}ms, got {}ms",
            MAX_DELAY_MS, config.random_delay_ms
        )));
    }

    if Selector::parse(&config.selector).is_err() {
        return Err(ConfigError::Validation(format!(
            "selector '{}' is not a valid CSS selector",
            config.selector
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
