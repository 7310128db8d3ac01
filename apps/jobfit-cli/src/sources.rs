//! Job sources backed by files on disk.
//!
//! - JSONL: one `{"identifier": ..., "description": ...}` object per line
//! - Directory: every `.txt` file below the root, in path order. A file whose
//!   first line is a URL uses it as the identifier; otherwise the path is.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;

use jobfit_core::traits::JobSource;
use jobfit_core::types::JobPosting;

pub struct JsonlJobSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl JsonlJobSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(Self { path: path.to_path_buf(), lines: BufReader::new(file).lines(), line_no: 0 })
    }
}

impl JobSource for JsonlJobSource {
    fn next_posting(&mut self) -> Result<Option<JobPosting>> {
        loop {
            let Some(line) = self.lines.next() else { return Ok(None) };
            self.line_no += 1;
            let line = line.with_context(|| format!("{}:{}", self.path.display(), self.line_no))?;
            if line.trim().is_empty() {
                continue;
            }
            let posting = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: invalid posting", self.path.display(), self.line_no))?;
            return Ok(Some(posting));
        }
    }
}

pub struct DirectoryJobSource {
    files: std::vec::IntoIter<PathBuf>,
}

impl DirectoryJobSource {
    pub fn open(root: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("txt")))
            .collect();
        files.sort();
        tracing::info!(root = %root.display(), files = files.len(), "posting directory scanned");
        Ok(Self { files: files.into_iter() })
    }
}

/// Splits a leading URL line off `text`, if there is one.
pub fn split_identifier(text: &str) -> Option<(&str, &str)> {
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    let first = first.trim();
    (first.starts_with("http://") || first.starts_with("https://")).then_some((first, rest))
}

impl JobSource for DirectoryJobSource {
    fn next_posting(&mut self) -> Result<Option<JobPosting>> {
        let Some(path) = self.files.next() else { return Ok(None) };
        let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let posting = match split_identifier(&text) {
            Some((url, rest)) => JobPosting::new(url, rest),
            None => JobPosting::new(path.display().to_string(), text),
        };
        Ok(Some(posting))
    }
}

/// A directory source for directories, a JSONL source for `.jsonl`/`.json` files.
pub fn open_source(path: &Path) -> Result<Box<dyn JobSource + Send>> {
    if path.is_dir() {
        return Ok(Box::new(DirectoryJobSource::open(path)?));
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("jsonl" | "json" | "ndjson") => Ok(Box::new(JsonlJobSource::open(path)?)),
        _ => bail!("unsupported postings source {} (expected a directory or .jsonl file)", path.display()),
    }
}
