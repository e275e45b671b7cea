//! Crawler module for walking the pages of a topic
//!
//! This module contains the core scraping logic, including:
//! - Page fetching behind the `PageFetcher` capability
//! - Topic page parsing
//! - Failure classification and retry timing
//! - The pagination engine that ties them together

mod fetcher;
mod observer;
mod paginator;
mod parser;
mod retry;

#[cfg(test)]
mod fixtures;

pub use fetcher::{
    build_http_client, classify_status, parse_retry_after, FailureKind, HttpFetcher,
    PageFetchResult, PageFetcher,
};
pub use observer::{NoopObserver, ScrapeObserver, TracingObserver};
pub use paginator::Paginator;
pub use parser::{parse_page, ParsedPage};
pub use retry::{RetryDecision, RetryPolicy};

use crate::config::Config;
use crate::state::ResultSet;
use crate::RippleError;
use std::sync::Arc;

/// Scrapes a topic over HTTP, logging progress through `tracing`
///
/// This is the main entry point for library users. It will:
/// 1. Build the HTTP client
/// 2. Walk every page of the topic with retries
/// 3. Return the deduplicated entries
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `topic_url` - Link to any page of the topic
///
/// # Returns
///
/// * `Ok(ResultSet)` - Scrape completed, possibly with skipped pages
/// * `Err(RippleError)` - Client setup failed or the scrape was aborted
pub async fn scrape(config: &Config, topic_url: &str) -> crate::Result<ResultSet> {
    let fetcher = HttpFetcher::new(&config.scraper)?;
    let paginator = Paginator::new(fetcher, config, Arc::new(TracingObserver));

    paginator
        .scrape(topic_url)
        .await
        .map_err(|e| RippleError::Fatal(Box::new(e)))
}
