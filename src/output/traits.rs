//! Output sink traits and types
//!
//! This module defines the trait interface for persisting a finished
//! scrape and the error type shared by sink implementations.

use crate::state::ResultSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Files produced by a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    /// The entry table
    pub data: PathBuf,

    /// Skipped pages, present only when there were any and they were saved
    pub errors: Option<PathBuf>,
}

/// Trait for result sinks
///
/// A sink receives the result set once the scrape is over and writes it
/// somewhere durable.
pub trait ResultSink {
    /// Persists the entries and page warnings of a result set
    ///
    /// # Arguments
    ///
    /// * `results` - The finished scrape
    ///
    /// # Returns
    ///
    /// The files that were written
    fn persist(&self, results: &ResultSet) -> OutputResult<WrittenFiles>;
}
