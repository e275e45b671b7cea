use crate::config::types::{Config, OutputConfig, RetryConfig, ScraperConfig};
use crate::{ConfigError, ConfigResult};

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_scraper_config(&config.scraper)?;
    validate_retry_config(&config.retry)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_scraper_config(config: &ScraperConfig) -> ConfigResult<()> {
    if config.allowed_hosts.is_empty() {
        return Err(ConfigError::Validation(
            "allowed_hosts must list at least one host".to_string(),
        ));
    }

    for host in &config.allowed_hosts {
        validate_host(host)?;
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_retry_config(config: &RetryConfig) -> ConfigResult<()> {
    for (name, value) in [
        ("rate_limited_max_attempts", config.rate_limited_max_attempts),
        ("forbidden_max_attempts", config.forbidden_max_attempts),
        ("transient_max_attempts", config.transient_max_attempts),
    ] {
        if value < 1 {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1, got {}",
                name, value
            )));
        }
    }

    if config.base_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "base_delay_ms ({}) cannot exceed max_delay_ms ({})",
            config.base_delay_ms, config.max_delay_ms
        )));
    }

    if config.transient_base_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "transient_base_delay_ms ({}) cannot exceed max_delay_ms ({})",
            config.transient_base_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates an allowed host entry (a bare hostname or IPv4 address)
fn validate_host(host: &str) -> ConfigResult<()> {
    if host.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Host cannot be empty".to_string(),
        ));
    }

    if !host
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.') || host.ends_with('.') || host.starts_with('-') || host.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' cannot start or end with '.' or '-'",
            host
        )));
    }

    if host.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' cannot contain consecutive dots",
            host
        )));
    }

    if !host.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' must contain at least one dot (e.g., 'eksisozluk.com')",
            host
        )));
    }

    Ok(())
}
