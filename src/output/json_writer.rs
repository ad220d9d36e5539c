//! JSON sink: an indented array of terminal result records

use crate::model::ResultEvent;
use crate::output::OutputResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the full result set as a pretty-printed JSON array.
pub struct JsonWriter {
    path: PathBuf,
}

impl JsonWriter {
    /// Creates a writer for the given base path, appending the `.json`
    /// extension if it is not already present.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        let mut path = base_path.as_ref().to_path_buf();
        if path.extension().map_or(true, |ext| ext != "json") {
            path.set_extension("json");
        }
        Self { path }
    }

    /// The resolved output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes all records to the output file, replacing any previous
    /// contents.
    pub fn write(&self, records: &[ResultEvent]) -> OutputResult<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }
}
