use serde::Serialize;

/// A single forum entry
///
/// Field order matches the column order of the CSV output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Site-wide entry identifier, used as the deduplication key
    pub entry_id: String,

    pub author: String,

    pub author_id: String,

    pub favorite_count: u32,

    /// Plain text body; line breaks from the source are kept
    pub content: String,

    /// Timestamp exactly as the site renders it, empty when missing
    pub date: String,

    /// 1-based page the entry was found on
    pub page_number: u32,
}

impl Entry {
    /// Column names of the tabular output, in order
    pub const COLUMNS: [&'static str; 7] = [
        "entry_id",
        "author",
        "author_id",
        "favorite_count",
        "content",
        "date",
        "page_number",
    ];
}
