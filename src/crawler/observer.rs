//! Progress reporting for the pagination engine
//!
//! The engine never logs directly; it reports to a `ScrapeObserver` handed
//! to it at construction. `TracingObserver` forwards to `tracing`,
//! `NoopObserver` discards everything.

use crate::crawler::fetcher::FailureKind;
use crate::state::{PageWarning, ResultSet};
use crate::FatalScrapeError;
use std::time::Duration;
use url::Url;

/// Receives events from a running scrape
///
/// Every method has an empty default so implementations only override what
/// they care about.
pub trait ScrapeObserver: Send + Sync {
    fn scrape_started(&self, _first_page: &Url) {}

    fn page_started(&self, _page: u32, _planned: u32) {}

    /// Inter-request pause before fetching `page`
    fn waiting(&self, _page: u32, _delay: Duration) {}

    /// Attempt `attempt` of `page` failed and will be retried after `delay`
    fn backoff(
        &self,
        _page: u32,
        _attempt: u32,
        _kind: FailureKind,
        _delay: Duration,
        _detail: &str,
    ) {
    }

    fn page_parsed(&self, _page: u32, _found: usize, _added: usize, _skipped: usize) {}

    /// `count` entries on `page` had no readable favorite count and were recorded as 0
    fn favorite_fallbacks(&self, _page: u32, _count: usize) {}

    fn page_count_grew(&self, _from: u32, _to: u32) {}

    fn page_skipped(&self, _warning: &PageWarning) {}

    fn scrape_finished(&self, _results: &ResultSet) {}

    fn scrape_aborted(&self, _error: &FatalScrapeError) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScrapeObserver for NoopObserver {}

/// Logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScrapeObserver for TracingObserver {
    fn scrape_started(&self, first_page: &Url) {
        tracing::info!("Starting scrape: {}", first_page);
    }

    fn page_started(&self, page: u32, planned: u32) {
        tracing::info!("Processing page {}/{}", page, planned);
    }

    fn waiting(&self, page: u32, delay: Duration) {
        tracing::debug!("Waiting {:.1}s before page {}", delay.as_secs_f64(), page);
    }

    fn backoff(
        &self,
        page: u32,
        attempt: u32,
        kind: FailureKind,
        delay: Duration,
        detail: &str,
    ) {
        tracing::warn!(
            "Page {} attempt {} failed ({}: {}); retrying in {:.1}s",
            page,
            attempt,
            kind,
            detail,
            delay.as_secs_f64()
        );
    }

    fn page_parsed(&self, page: u32, found: usize, added: usize, skipped: usize) {
        if skipped > 0 {
            tracing::debug!("Page {}: {} entry elements without an id ignored", page, skipped);
        }
        if found > 0 && added == 0 {
            tracing::warn!("No new entries on page {} (all {} were duplicates)", page, found);
        } else {
            tracing::info!("Page {}: {} entries found, {} new", page, found, added);
        }
    }

    fn favorite_fallbacks(&self, page: u32, count: usize) {
        tracing::warn!(
            "Page {}: {} entries without a readable favorite count, recorded as 0",
            page,
            count
        );
    }

    fn page_count_grew(&self, from: u32, to: u32) {
        tracing::info!("Topic grew while scraping: {} -> {} pages", from, to);
    }

    fn page_skipped(&self, warning: &PageWarning) {
        tracing::warn!(
            "Skipping page {} after {} attempt(s): {} ({})",
            warning.page,
            warning.attempts,
            warning.kind,
            warning.detail
        );
    }

    fn scrape_finished(&self, results: &ResultSet) {
        tracing::info!(
            "Scrape completed: {} unique entries from {}/{} pages",
            results.len(),
            results.pages_scraped_count(),
            results.planned_pages()
        );
        if results.duplicates_dropped() > 0 {
            tracing::info!("Duplicate entries filtered: {}", results.duplicates_dropped());
        }
        if !results.warnings().is_empty() {
            tracing::warn!("Pages skipped: {}", results.warnings().len());
        }
    }

    fn scrape_aborted(&self, error: &FatalScrapeError) {
        tracing::error!("{}", error);
    }
}
