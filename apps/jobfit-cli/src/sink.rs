//! Single-column CSV output: one accepted identifier per row, appended.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use jobfit_core::traits::ResultSink;

pub struct CsvSink {
    writer: BufWriter<File>,
}

impl CsvSink {
    /// Opens `path` for appending, creating it and its parent directory.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening {} for append", path.display()))?;
        Ok(Self { writer: BufWriter::new(file) })
    }
}

/// Quotes a field holding a comma, quote or line break; inner quotes double.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl ResultSink for CsvSink {
    fn record(&mut self, identifier: &str) -> Result<()> {
        writeln!(self.writer, "{}", csv_field(identifier))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
