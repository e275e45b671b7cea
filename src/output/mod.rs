//! Output module for persisting and reporting scrape results
//!
//! This module handles:
//! - Writing entries and skipped pages as CSV files
//! - Naming output files after the topic
//! - Printing the end-of-run summary

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{suggest_file_stem, CsvOutput};
pub use stats::{format_summary, print_summary};
pub use traits::{OutputError, OutputResult, ResultSink, WrittenFiles};
