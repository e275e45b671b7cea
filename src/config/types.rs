use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sozluk-Ripple
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Page walking behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScraperConfig {
    /// Pause before every page after the first (milliseconds)
    pub delay_ms: u64,

    /// Hosts a topic URL may point at; subdomains are accepted too
    pub allowed_hosts: Vec<String>,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            allowed_hosts: vec!["eksisozluk.com".to_string()],
            request_timeout_secs: 30,
        }
    }
}

impl ScraperConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Backoff and give-up thresholds per failure class
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// First backoff after a rate limit; doubles on every further attempt
    pub base_delay_ms: u64,

    /// Step for the linear backoff used on network errors and malformed pages
    pub transient_base_delay_ms: u64,

    /// Upper bound for every backoff, also the wait before retrying a 403
    pub max_delay_ms: u64,

    pub rate_limited_max_attempts: u32,
    pub forbidden_max_attempts: u32,
    pub transient_max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 10_000,
            transient_base_delay_ms: 5_000,
            max_delay_ms: 60_000,
            rate_limited_max_attempts: 5,
            forbidden_max_attempts: 2,
            transient_max_attempts: 3,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives generated CSV files
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "data".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Show progress at info level; when false only warnings and errors reach the console
    pub verbose: bool,

    /// Optional file that receives every event at debug level
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            file: None,
        }
    }
}
