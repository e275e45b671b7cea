//! Summary display for a finished scrape
//!
//! This module renders the `Summary` of a result set as the human-readable
//! block printed at the end of a run.

use crate::state::Summary;
use std::fmt::Write;

/// Formats summary statistics as a multi-line report
///
/// # Arguments
///
/// * `summary` - The statistics to display
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Scraping Summary ===\n");
    let _ = writeln!(out, "Total entries: {}", summary.total_entries);
    let _ = writeln!(out, "Unique authors: {}", summary.unique_authors);
    let _ = writeln!(out, "Total favorites: {}", summary.total_favorites);
    let _ = writeln!(
        out,
        "Pages scraped: {} / {}",
        summary.pages_scraped, summary.planned_pages
    );

    if let (Some(earliest), Some(latest)) = (&summary.earliest_date, &summary.latest_date) {
        let _ = writeln!(out, "Date range: {} - {}", earliest, latest);
    }

    if summary.duplicates_dropped > 0 {
        let _ = writeln!(out, "Duplicates filtered: {}", summary.duplicates_dropped);
    }

    if summary.favorite_fallbacks > 0 {
        let _ = writeln!(
            out,
            "Entries with unreadable favorite count (saved as 0): {}",
            summary.favorite_fallbacks
        );
    }

    if !summary.top_authors.is_empty() {
        let _ = writeln!(out, "\nTop {} Authors:", summary.top_authors.len());
        for (rank, (author, count)) in summary.top_authors.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}: {} entries", rank + 1, author, count);
        }
    }

    out
}

/// Prints summary statistics to stdout
pub fn print_summary(summary: &Summary) {
    println!("{}", format_summary(summary));
}
