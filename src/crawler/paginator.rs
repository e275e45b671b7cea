//! Pagination engine - walks every page of a topic
//!
//! This module contains the scrape loop that coordinates:
//! - Validating the topic URL
//! - Fetching page 1 and learning the page count
//! - Pacing later pages with the inter-request delay
//! - Retrying failures per the `RetryPolicy`
//! - Skipping pages that keep failing without aborting the topic
//! - Feeding entries into a deduplicating `ResultSet`

use crate::config::Config;
use crate::crawler::fetcher::{FailureKind, PageFetchResult, PageFetcher};
use crate::crawler::observer::ScrapeObserver;
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::crawler::retry::{RetryDecision, RetryPolicy};
use crate::state::{PageWarning, ResultSet};
use crate::url::{normalize_topic_url, page_url};
use crate::{FatalReason, FatalScrapeError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

/// How a single page ended up after all its attempts
enum PageOutcome {
    Parsed(ParsedPage),
    GaveUp {
        kind: FailureKind,
        attempts: u32,
        detail: String,
    },
}

/// Sequential scraper for one topic at a time
///
/// Pages are fetched strictly one after another; the pause between them and
/// the retry backoff are the only waits.
pub struct Paginator<F: PageFetcher> {
    fetcher: F,
    policy: RetryPolicy,
    delay: Duration,
    allowed_hosts: Vec<String>,
    observer: Arc<dyn ScrapeObserver>,
}

impl<F: PageFetcher> Paginator<F> {
    /// Creates a paginator
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of raw page content
    /// * `config` - Supplies the delay, retry thresholds and allowed hosts
    /// * `observer` - Receives progress events
    pub fn new(fetcher: F, config: &Config, observer: Arc<dyn ScrapeObserver>) -> Self {
        Self {
            fetcher,
            policy: RetryPolicy::from_config(&config.retry),
            delay: config.scraper.delay(),
            allowed_hosts: config.scraper.allowed_hosts.clone(),
            observer,
        }
    }

    /// Scrapes every page of a topic
    ///
    /// Page 1 must succeed: without it there is no page count. Later pages
    /// that exhaust their retries are recorded as warnings and skipped. The
    /// page count is re-read from every parsed page and the plan grows when
    /// the topic does, but never shrinks.
    ///
    /// # Returns
    ///
    /// * `Ok(ResultSet)` - All planned pages were processed or skipped
    /// * `Err(FatalScrapeError)` - Invalid URL or page 1 unavailable; carries
    ///   the (empty) partial result
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sozluk_ripple::config::Config;
    /// use sozluk_ripple::crawler::{HttpFetcher, Paginator, TracingObserver};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config::default();
    /// let fetcher = HttpFetcher::new(&config.scraper)?;
    /// let paginator = Paginator::new(fetcher, &config, Arc::new(TracingObserver));
    /// let results = paginator.scrape("https://eksisozluk.com/test--114").await?;
    /// println!("{} entries", results.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn scrape(&self, topic_url: &str) -> Result<ResultSet, FatalScrapeError> {
        let mut results = ResultSet::new();

        let base = match normalize_topic_url(topic_url, &self.allowed_hosts) {
            Ok(url) => url,
            Err(e) => return Err(self.abort(FatalReason::InvalidTopicUrl(e), results)),
        };
        results.set_topic_url(base.clone());

        let first_url = page_url(&base, 1);
        self.observer.scrape_started(&first_url);
        self.observer.page_started(1, 1);

        let first = match self.fetch_page(&first_url, 1).await {
            PageOutcome::Parsed(parsed) => parsed,
            PageOutcome::GaveUp {
                kind,
                attempts,
                detail,
            } => {
                let reason = FatalReason::FirstPageUnavailable {
                    kind,
                    attempts,
                    detail,
                };
                return Err(self.abort(reason, results));
            }
        };

        let mut planned = first.page_count;
        results.extend_plan(planned);
        self.absorb(&mut results, 1, first);

        let mut page = 2;
        while page <= planned {
            self.observer.page_started(page, planned);
            self.observer.waiting(page, self.delay);
            sleep(self.delay).await;

            let url = page_url(&base, page);
            match self.fetch_page(&url, page).await {
                PageOutcome::Parsed(parsed) => {
                    if parsed.page_count > planned {
                        self.observer.page_count_grew(planned, parsed.page_count);
                        planned = parsed.page_count;
                        results.extend_plan(planned);
                    }
                    self.absorb(&mut results, page, parsed);
                }
                PageOutcome::GaveUp {
                    kind,
                    attempts,
                    detail,
                } => {
                    let warning = PageWarning {
                        page,
                        kind,
                        attempts,
                        url: url.to_string(),
                        detail,
                    };
                    self.observer.page_skipped(&warning);
                    results.record_warning(warning);
                }
            }

            page += 1;
        }

        self.observer.scrape_finished(&results);
        Ok(results)
    }

    /// Fetches and parses one page, retrying per the policy
    async fn fetch_page(&self, url: &Url, page: u32) -> PageOutcome {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let (kind, hint, detail) = match self.fetcher.fetch(url).await {
                PageFetchResult::Success { body } => match parse_page(&body, page) {
                    Ok(parsed) => return PageOutcome::Parsed(parsed),
                    Err(e) => (FailureKind::Malformed, None, e.to_string()),
                },
                PageFetchResult::Failure {
                    kind,
                    retry_after_hint,
                    detail,
                } => (kind, retry_after_hint, detail),
            };

            match self.policy.decide(attempt, kind) {
                RetryDecision::Retry(delay) => {
                    let delay = self.policy.honor_hint(delay, hint);
                    self.observer.backoff(page, attempt, kind, delay, &detail);
                    sleep(delay).await;
                }
                RetryDecision::GiveUp => {
                    return PageOutcome::GaveUp {
                        kind,
                        attempts: attempt,
                        detail,
                    }
                }
            }
        }
    }

    fn absorb(&self, results: &mut ResultSet, page: u32, parsed: ParsedPage) {
        let found = parsed.entries.len();
        let added = results.add_page(page, parsed.entries);
        self.observer
            .page_parsed(page, found, added, parsed.skipped_elements);

        // Non-fatal: the entries are kept with a count of 0
        if parsed.favorite_fallbacks > 0 {
            results.record_favorite_fallbacks(parsed.favorite_fallbacks);
            self.observer.favorite_fallbacks(page, parsed.favorite_fallbacks);
        }
    }

    fn abort(&self, reason: FatalReason, partial: ResultSet) -> FatalScrapeError {
        let error = FatalScrapeError::new(reason, partial);
        self.observer.scrape_aborted(&error);
        error
    }
}
