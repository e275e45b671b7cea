//! Sozluk-Ripple: a patient topic scraper
//!
//! This crate walks every page of a single forum topic, collects its entries,
//! survives rate limiting and flaky pages through classified retries, and hands
//! back an ordered, deduplicated result set ready to be written as CSV.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use crate::crawler::FailureKind;
use crate::state::ResultSet;
use thiserror::Error;

/// Main error type for Sozluk-Ripple operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("{0}")]
    Fatal(#[from] Box<FatalScrapeError>),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Host '{0}' is not an allowed topic host")]
    UnsupportedHost(String),

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Raised when a fetched page does not have the shape of a topic page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed page: {0}")]
    Malformed(String),
}

/// Why a scrape had to stop before producing a complete result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalReason {
    #[error("invalid topic URL: {0}")]
    InvalidTopicUrl(#[from] UrlError),

    #[error("first page unavailable after {attempts} attempt(s) ({kind}): {detail}")]
    FirstPageUnavailable {
        kind: FailureKind,
        attempts: u32,
        detail: String,
    },
}

/// A scrape failure that cannot be recovered from
///
/// Whatever was collected before the failure travels with the error in
/// `partial`, so callers can still inspect or persist it.
#[derive(Debug, Error)]
#[error("Scrape aborted: {reason}")]
pub struct FatalScrapeError {
    pub reason: FatalReason,
    pub partial: ResultSet,
}

impl FatalScrapeError {
    pub fn new(reason: FatalReason, partial: ResultSet) -> Self {
        Self { reason, partial }
    }
}

/// Result type alias for Sozluk-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{PageFetcher, Paginator, RetryPolicy};
pub use state::{Entry, Summary};
pub use url::{normalize_topic_url, page_url, topic_slug};
