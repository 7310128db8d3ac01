//! In-memory job source and result sink.

use std::collections::VecDeque;

use jobfit_core::traits::{JobSource, ResultSink};
use jobfit_core::types::JobPosting;

#[derive(Debug, Default)]
pub struct VecJobSource {
    postings: VecDeque<JobPosting>,
}

impl VecJobSource {
    pub fn new(postings: impl IntoIterator<Item = JobPosting>) -> Self {
        Self { postings: postings.into_iter().collect() }
    }
}

impl JobSource for VecJobSource {
    fn next_posting(&mut self) -> anyhow::Result<Option<JobPosting>> {
        Ok(self.postings.pop_front())
    }
}

/// Collects accepted identifiers in the order they were recorded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySink {
    pub identifiers: Vec<String>,
}

impl ResultSink for MemorySink {
    fn record(&mut self, identifier: &str) -> anyhow::Result<()> {
        self.identifiers.push(identifier.to_string());
        Ok(())
    }
}
