//! CSV sink for scrape results
//!
//! Files are UTF-8 with a byte order mark so spreadsheet applications pick
//! the right encoding for Turkish text. The entry table is named after the
//! topic; skipped pages go to a sibling `_errors.csv` file.

use crate::output::traits::{OutputError, OutputResult, ResultSink, WrittenFiles};
use crate::state::{Entry, ResultSet};
use crate::url::topic_slug;
use chrono::Local;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes result sets as CSV files
#[derive(Debug, Clone)]
pub struct CsvOutput {
    directory: PathBuf,
    explicit_path: Option<PathBuf>,
    timestamp: String,
}

impl CsvOutput {
    /// Creates a sink writing generated file names into `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            explicit_path: None,
            timestamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// Writes the entry table to exactly this path instead of a generated name
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Overrides the `YYYYmmdd_HHMMSS` stamp used in generated names
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Path the entry table will be written to
    pub fn data_path(&self, results: &ResultSet) -> PathBuf {
        if let Some(path) = &self.explicit_path {
            return path.clone();
        }

        let slug = results.topic_url().map(topic_slug);
        let stem = suggest_file_stem(slug.as_deref(), results.planned_pages(), &self.timestamp);
        self.directory.join(format!("{}.csv", stem))
    }

    fn fallback_path(&self) -> PathBuf {
        self.directory.join(format!("error_{}.csv", self.timestamp))
    }
}

impl ResultSink for CsvOutput {
    fn persist(&self, results: &ResultSet) -> OutputResult<WrittenFiles> {
        let primary = self.data_path(results);

        let data = match write_entries(&primary, results.entries()) {
            Ok(()) => primary,
            Err(e) => {
                tracing::error!("Failed to write {}: {}", primary.display(), e);
                let fallback = self.fallback_path();
                write_entries(&fallback, results.entries())?;
                tracing::warn!("Data saved to fallback file: {}", fallback.display());
                fallback
            }
        };
        tracing::info!("Data saved to: {}", data.display());

        let errors = if results.warnings().is_empty() {
            None
        } else {
            let path = errors_path(&data);
            match write_warnings(&path, results) {
                Ok(()) => {
                    tracing::info!("Errors saved to: {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    tracing::error!("Failed to write error log {}: {}", path.display(), e);
                    None
                }
            }
        };

        Ok(WrittenFiles { data, errors })
    }
}

/// Builds the file stem for a topic scrape
///
/// `{slug}_{pages}sayfa_{timestamp}` when the topic is known and has pages,
/// otherwise `eksisozluk_entries_{timestamp}`.
///
/// # Example
///
/// ```
/// use sozluk_ripple::output::suggest_file_stem;
///
/// let stem = suggest_file_stem(Some("baslik"), 12, "20240101_120000");
/// assert_eq!(stem, "baslik_12sayfa_20240101_120000");
/// ```
pub fn suggest_file_stem(slug: Option<&str>, pages: u32, timestamp: &str) -> String {
    match slug {
        Some(slug) if !slug.is_empty() && pages > 0 => {
            format!("{}_{}sayfa_{}", slug, pages, timestamp)
        }
        _ => format!("eksisozluk_entries_{}", timestamp),
    }
}

/// Path of the error log that accompanies a data file
fn errors_path(data: &Path) -> PathBuf {
    let stem = data
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "entries".to_string());
    data.with_file_name(format!("{}_errors.csv", stem))
}

/// Opens a CSV writer on a fresh file that starts with a BOM
fn create_writer(path: &Path) -> OutputResult<csv::Writer<BufWriter<File>>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;

    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file))
}

fn write_entries(path: &Path, entries: &[Entry]) -> OutputResult<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(Entry::COLUMNS)?;
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer
        .flush()
        .map_err(|e| OutputError::Write(format!("{}: {}", path.display(), e)))
}

fn write_warnings(path: &Path, results: &ResultSet) -> OutputResult<()> {
    let mut writer = create_writer(path)?;
    writer.write_record(["page", "error", "url"])?;
    for warning in results.warnings() {
        let error = format!(
            "{} after {} attempt(s): {}",
            warning.kind, warning.attempts, warning.detail
        );
        writer.write_record([warning.page.to_string(), error, warning.url.clone()])?;
    }
    writer
        .flush()
        .map_err(|e| OutputError::Write(format!("{}: {}", path.display(), e)))
}
