//! Summary statistics for a finished scrape

use crate::state::result_set::ResultSet;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};

/// How many authors to list in `top_authors`
const TOP_AUTHORS: usize = 5;

/// Statistics derived from a `ResultSet`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_entries: usize,
    pub unique_authors: usize,
    pub total_favorites: u64,

    /// Earliest and latest entry dates as rendered by the site
    pub earliest_date: Option<String>,
    pub latest_date: Option<String>,

    pub pages_scraped: u32,
    pub planned_pages: u32,
    pub duplicates_dropped: usize,
    pub warnings: usize,

    /// Entries whose favorite count was unreadable and recorded as 0
    pub favorite_fallbacks: usize,

    /// Most prolific authors with their entry counts, busiest first
    pub top_authors: Vec<(String, usize)>,
}

impl Summary {
    /// Builds a summary from a result set
    pub fn from_results(results: &ResultSet) -> Self {
        let entries = results.entries();

        let unique_authors = entries
            .iter()
            .map(|e| e.author.as_str())
            .filter(|author| !author.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let total_favorites = entries.iter().map(|e| u64::from(e.favorite_count)).sum();

        let dates: Vec<&str> = entries.iter().map(|e| e.date.as_str()).collect();
        let (earliest_date, latest_date) = date_range(&dates);

        Self {
            total_entries: entries.len(),
            unique_authors,
            total_favorites,
            earliest_date,
            latest_date,
            pages_scraped: results.pages_scraped_count(),
            planned_pages: results.planned_pages(),
            duplicates_dropped: results.duplicates_dropped(),
            warnings: results.warnings().len(),
            favorite_fallbacks: results.favorite_fallbacks(),
            top_authors: top_authors(results),
        }
    }
}

/// Parses an entry date in the site's `dd.mm.yyyy HH:MM` format
///
/// Edit suffixes (`"01.02.2020 10:00 ~ 11:30"`) are ignored, and a bare
/// `dd.mm.yyyy` parses as midnight.
pub fn parse_entry_date(raw: &str) -> Option<NaiveDateTime> {
    let created = raw.split('~').next()?.trim();

    if let Ok(parsed) = NaiveDateTime::parse_from_str(created, "%d.%m.%Y %H:%M") {
        return Some(parsed);
    }

    NaiveDate::parse_from_str(created, "%d.%m.%Y")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Finds the earliest and latest dates
///
/// Parsed timestamps are compared when at least one date parses; otherwise
/// the non-empty strings are compared lexicographically.
fn date_range(dates: &[&str]) -> (Option<String>, Option<String>) {
    let parsed: Vec<(NaiveDateTime, &str)> = dates
        .iter()
        .filter_map(|raw| parse_entry_date(raw).map(|p| (p, *raw)))
        .collect();

    if !parsed.is_empty() {
        let earliest = parsed.iter().min_by_key(|(p, _)| *p).map(|(_, r)| r.to_string());
        let latest = parsed.iter().max_by_key(|(p, _)| *p).map(|(_, r)| r.to_string());
        return (earliest, latest);
    }

    let present = dates.iter().filter(|d| !d.trim().is_empty());
    let earliest = present.clone().min().map(|d| d.to_string());
    let latest = present.max().map(|d| d.to_string());
    (earliest, latest)
}

fn top_authors(results: &ResultSet) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    // Entries without an author are not ranked
    for entry in results.entries().iter().filter(|e| !e.author.is_empty()) {
        *counts.entry(entry.author.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(author, count)| (author.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_AUTHORS);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Entry;

    fn entry(id: &str, author: &str, favorites: u32, date: &str) -> Entry {
        Entry {
            entry_id: id.to_string(),
            author: author.to_string(),
            author_id: String::new(),
            favorite_count: favorites,
            content: String::new(),
            date: date.to_string(),
            page_number: 1,
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = ResultSet::new().summarize();
        assert_eq!(summary.total_entries, 0);
        assert_eq!(summary.unique_authors, 0);
        assert_eq!(summary.earliest_date, None);
        assert!(summary.top_authors.is_empty());
    }

    #[test]
    fn test_counts_and_favorites() {
        let mut results = ResultSet::new();
        results.add_page(
            1,
            vec![
                entry("1", "ali", 3, ""),
                entry("2", "veli", 0, ""),
                entry("3", "ali", 4, ""),
            ],
        );
        results.extend_plan(2);

        let summary = results.summarize();
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.unique_authors, 2);
        assert_eq!(summary.total_favorites, 7);
        assert_eq!(summary.pages_scraped, 1);
        assert_eq!(summary.planned_pages, 2);
        assert_eq!(summary.top_authors[0], ("ali".to_string(), 2));
    }

    #[test]
    fn test_date_range_uses_parsed_dates() {
        let mut results = ResultSet::new();
        results.add(entry("1", "a", 0, "02.01.2021 10:00"));
        results.add(entry("2", "a", 0, "15.12.2019 23:59 ~ 16.12.2019 00:10"));
        results.add(entry("3", "a", 0, "01.06.2020"));
        results.add(entry("4", "a", 0, ""));

        let summary = results.summarize();
        assert_eq!(
            summary.earliest_date.as_deref(),
            Some("15.12.2019 23:59 ~ 16.12.2019 00:10")
        );
        assert_eq!(summary.latest_date.as_deref(), Some("02.01.2021 10:00"));
    }

    #[test]
    fn test_date_range_falls_back_to_text() {
        let mut results = ResultSet::new();
        results.add(entry("1", "a", 0, "yesterday"));
        results.add(entry("2", "a", 0, "last week"));

        let summary = results.summarize();
        assert_eq!(summary.earliest_date.as_deref(), Some("last week"));
        assert_eq!(summary.latest_date.as_deref(), Some("yesterday"));
    }

    #[test]
    fn test_parse_entry_date() {
        assert!(parse_entry_date("17.02.1999 14:30").is_some());
        assert!(parse_entry_date("17.02.1999").is_some());
        assert!(parse_entry_date("").is_none());
        assert!(parse_entry_date("not a date").is_none());
    }

    #[test]
    fn test_top_authors_limited_and_ordered() {
        let mut results = ResultSet::new();
        let authors = ["a", "b", "b", "c", "c", "c", "d", "e", "f"];
        for (i, author) in authors.iter().enumerate() {
            results.add(entry(&i.to_string(), author, 0, ""));
        }

        let top = results.summarize().top_authors;
        assert_eq!(top.len(), 5);
        assert_eq!(top[0], ("c".to_string(), 3));
        assert_eq!(top[1], ("b".to_string(), 2));
        // Ties broken alphabetically
        assert_eq!(top[2], ("a".to_string(), 1));
    }

    #[test]
    fn test_entries_without_author_are_not_counted() {
        let mut results = ResultSet::new();
        results.add(entry("1", "a", 0, ""));
        results.add(entry("2", "", 0, ""));
        results.add(entry("3", "", 0, ""));

        let summary = results.summarize();
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.unique_authors, 1);
        assert_eq!(summary.top_authors, vec![("a".to_string(), 1)]);
    }

    #[test]
    fn test_favorite_fallbacks_carried_into_summary() {
        let mut results = ResultSet::new();
        results.add_page(1, vec![entry("1", "a", 0, "")]);
        results.record_favorite_fallbacks(1);
        results.record_favorite_fallbacks(2);

        assert_eq!(results.summarize().favorite_fallbacks, 3);
    }
}
