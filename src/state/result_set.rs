use crate::crawler::FailureKind;
use crate::state::entry::Entry;
use crate::state::summary::Summary;
use std::collections::{BTreeSet, HashSet};
use url::Url;

/// A page that was given up on and left out of the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWarning {
    pub page: u32,
    pub kind: FailureKind,
    pub attempts: u32,
    pub url: String,
    pub detail: String,
}

/// Ordered, deduplicated collection of entries from one topic
///
/// Entries keep insertion order (page order, then in-page order). The first
/// entry seen for an `entry_id` wins; later copies are dropped and counted.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    topic_url: Option<Url>,
    entries: Vec<Entry>,
    seen_ids: HashSet<String>,
    pages_scraped: BTreeSet<u32>,
    planned_pages: u32,
    warnings: Vec<PageWarning>,
    duplicates_dropped: usize,
    favorite_fallbacks: usize,
}

impl ResultSet {
    /// Creates an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry unless its id is already present
    ///
    /// Returns `true` if the entry was added.
    pub fn add(&mut self, entry: Entry) -> bool {
        if self.seen_ids.contains(&entry.entry_id) {
            self.duplicates_dropped += 1;
            return false;
        }

        self.seen_ids.insert(entry.entry_id.clone());
        self.entries.push(entry);
        true
    }

    /// Adds every entry of a successfully processed page
    ///
    /// Marks the page as scraped even when it contributed nothing new.
    /// Returns how many entries were actually added.
    pub fn add_page(&mut self, page: u32, entries: Vec<Entry>) -> usize {
        self.pages_scraped.insert(page);

        let mut added = 0;
        for entry in entries {
            if self.add(entry) {
                added += 1;
            }
        }
        added
    }

    /// Records a page that was skipped after its retries ran out
    pub fn record_warning(&mut self, warning: PageWarning) {
        self.warnings.push(warning);
    }

    /// Counts entries whose favorite count defaulted to 0 while parsing
    pub fn record_favorite_fallbacks(&mut self, count: usize) {
        self.favorite_fallbacks += count;
    }

    /// Raises the number of pages the scrape intends to cover
    ///
    /// The plan only ever grows.
    pub fn extend_plan(&mut self, pages: u32) {
        self.planned_pages = self.planned_pages.max(pages);
    }

    pub fn set_topic_url(&mut self, url: Url) {
        self.topic_url = Some(url);
    }

    /// Canonical topic URL, once it has been validated
    pub fn topic_url(&self) -> Option<&Url> {
        self.topic_url.as_ref()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn warnings(&self) -> &[PageWarning] {
        &self.warnings
    }

    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    pub fn favorite_fallbacks(&self) -> usize {
        self.favorite_fallbacks
    }

    /// Pages whose content made it into the result, in ascending order
    pub fn pages_scraped(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages_scraped.iter().copied()
    }

    pub fn pages_scraped_count(&self) -> u32 {
        self.pages_scraped.len() as u32
    }

    pub fn planned_pages(&self) -> u32 {
        self.planned_pages
    }

    /// Computes summary statistics over the collected entries
    pub fn summarize(&self) -> Summary {
        Summary::from_results(self)
    }
}
