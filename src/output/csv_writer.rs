//! CSV sink: one delimited row per terminal result record
//!
//! Heading lists are joined with a literal `" | "` separator and timestamps
//! are formatted as `YYYY-MM-DD HH:MM:SS`. Error records keep the same
//! column layout with empty content fields.

use crate::model::ResultEvent;
use crate::output::OutputResult;
use std::path::{Path, PathBuf};

/// Column header of the tabular output
pub const CSV_HEADER: [&str; 7] = [
    "URL",
    "Title",
    "Description",
    "H1s",
    "H2s",
    "Links",
    "ScrapedAt",
];

const HEADING_SEPARATOR: &str = " | ";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Joins a heading list into one CSV cell
pub fn join_headings(headings: &[String]) -> String {
    headings.join(HEADING_SEPARATOR)
}

/// Splits a CSV cell back into the heading list
pub fn split_headings(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(HEADING_SEPARATOR).map(String::from).collect()
}

/// Writes terminal result records as delimited rows.
pub struct CsvWriter {
    path: PathBuf,
}

impl CsvWriter {
    /// Creates a writer for the given base path, appending the `.csv`
    /// extension if it is not already present.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        let mut path = base_path.as_ref().to_path_buf();
        if path.extension().map_or(true, |ext| ext != "csv") {
            path.set_extension("csv");
        }
        Self { path }
    }

    /// The resolved output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header row followed by one row per record, replacing any
    /// previous contents.
    pub fn write(&self, records: &[ResultEvent]) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(&self.path)?;

        writer.write_record(CSV_HEADER)?;

        for record in records {
            let content = record.content.clone().unwrap_or_default();
            writer.write_record(&[
                record.url.clone(),
                content.title,
                content.description,
                join_headings(&content.headings.h1),
                join_headings(&content.headings.h2),
                content.link_count.to_string(),
                record.scraped_at.format(TIMESTAMP_FORMAT).to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}
