#![allow(dead_code)]

use std::collections::HashMap;

use jobfit_core::traits::{Embedder, JobSource, KeywordExtractor};
use jobfit_core::types::{JobPosting, KeywordSet};
use jobfit_core::{Error, Result};

/// Fixed vectors per exact text; unknown texts fail.
pub struct TableEmbedder {
    table: HashMap<String, Vec<f32>>,
}

impl TableEmbedder {
    pub fn new(entries: &[(&str, Vec<f32>)]) -> Self {
        Self { table: entries.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect() }
    }
}

impl Embedder for TableEmbedder {
    fn embedder_id(&self) -> &str { "test:table" }
    fn dim(&self) -> usize { 5 }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts
            .iter()
            .map(|t| self.table.get(t).cloned().ok_or_else(|| anyhow::anyhow!("no vector for '{t}'")))
            .collect()
    }
}

/// Returns a preset keyword set per exact input text; empty text gives an
/// empty set and text containing "malformed" fails.
pub struct TableExtractor {
    table: HashMap<String, KeywordSet>,
}

impl TableExtractor {
    pub fn new(entries: &[(&str, &[&str])]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(text, kws)| ((*text).to_string(), kws.iter().map(|k| (*k).to_string()).collect()))
                .collect(),
        }
    }
}

impl KeywordExtractor for TableExtractor {
    fn name(&self) -> &'static str { "table" }
    fn extract(&self, text: &str) -> Result<KeywordSet> {
        if text.contains("malformed") {
            return Err(Error::Extraction("parser rejected input".into()));
        }
        Ok(self.table.get(text).cloned().unwrap_or_default())
    }
}

/// Yields the given entries; `Err` entries simulate unreadable listings.
pub struct FlakySource {
    entries: std::vec::IntoIter<std::result::Result<JobPosting, String>>,
}

impl FlakySource {
    pub fn new(entries: Vec<std::result::Result<JobPosting, String>>) -> Self {
        Self { entries: entries.into_iter() }
    }
}

impl JobSource for FlakySource {
    fn next_posting(&mut self) -> anyhow::Result<Option<JobPosting>> {
        match self.entries.next() {
            Some(Ok(p)) => Ok(Some(p)),
            Some(Err(msg)) => Err(anyhow::anyhow!(msg)),
            None => Ok(None),
        }
    }
}

pub const RESUME: &str = "resume text";

/// Keyword axes 0..3, chunk axes 3..5.
pub fn scenario_embedder() -> TableEmbedder {
    TableEmbedder::new(&[
        ("react", vec![1.0, 0.0, 0.0, 0.0, 0.0]),
        ("node.js", vec![0.0, 1.0, 0.0, 0.0, 0.0]),
        ("docker", vec![0.0, 0.1, 0.99_f32.sqrt(), 0.0, 0.0]),
        ("kubernetes", vec![0.0, 0.0, 1.0, 0.0, 0.0]),
        ("resume text", vec![0.0, 0.0, 0.0, 1.0, 0.0]),
        // cos(resume text, close job) = 0.8
        ("close job", vec![0.0, 0.0, 0.0, 0.8, 0.6]),
        ("same job", vec![0.0, 0.0, 0.0, 1.0, 0.0]),
        ("far job", vec![0.0, 0.0, 0.0, 0.0, 1.0]),
        // One axis short of the declared dimension.
        ("truncated job", vec![0.0, 0.0, 0.0, 1.0]),
    ])
}

pub fn scenario_extractor() -> TableExtractor {
    TableExtractor::new(&[
        ("resume text", &["react", "node.js"]),
        ("close job", &["react", "docker"]),
        ("same job", &["docker", "kubernetes"]),
        ("far job", &["react"]),
    ])
}
