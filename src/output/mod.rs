//! Durable output sinks for terminal result records
//!
//! Both writers share one base path: `results` becomes `results.json` and
//! `results.csv`. Writing happens after the pool has drained, so a sink
//! failure is reported to the operator without affecting the run itself.

mod csv_writer;
mod json_writer;

pub use csv_writer::{join_headings, split_headings, CsvWriter, CSV_HEADER};
pub use json_writer::JsonWriter;

use thiserror::Error;

/// Errors that can occur while writing durable output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
