//! State module for the data collected during a scrape
//!
//! # Components
//!
//! - `Entry`: One forum post as it will appear in the output table
//! - `ResultSet`: Ordered, deduplicated entries plus page-level bookkeeping
//! - `Summary`: Statistics derived from a finished `ResultSet`

mod entry;
mod result_set;
mod summary;

// Re-export main types
pub use entry::Entry;
pub use result_set::{PageWarning, ResultSet};
pub use summary::{parse_entry_date, Summary};
