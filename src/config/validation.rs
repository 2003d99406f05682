use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::ConfigError;

/// Upper bound on the scrape pool size
const MAX_CONCURRENCY: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "crawler.concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.walk_budget_secs < 1 {
        return Err(ConfigError::Validation(
            "crawler.walk-budget-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "http.timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.rate_limit_interval_ms < 1 {
        return Err(ConfigError::Validation(
            "http.rate-limit-interval-ms must be >= 1".to_string(),
        ));
    }

    if let Some(agents) = &config.user_agents {
        if agents.is_empty() {
            return Err(ConfigError::Validation(
                "http.user-agents cannot be an empty list".to_string(),
            ));
        }

        if agents.iter().any(|agent| agent.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "http.user-agents cannot contain empty strings".to_string(),
            ));
        }
    }

    if config.connectivity_probe.trim().is_empty() {
        return Err(ConfigError::Validation(
            "http.connectivity-probe cannot be empty".to_string(),
        ));
    }

    if config.connectivity_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "http.connectivity-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output.path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
