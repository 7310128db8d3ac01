//! jobfit-score
//!
//! Relevance scoring of job postings against a résumé: canonical skill
//! normalization, keyword extraction, fuzzy keyword coverage, chunked
//! similarity and weighted fusion into a pass/fail verdict.
pub mod extract;
pub mod fusion;
pub mod matcher;
pub mod pipeline;
pub mod runner;
pub mod similarity;
pub mod source;
pub mod taxonomy;

pub use extract::{build_extractor, PhraseRankingExtractor, StructuredExtractor};
pub use fusion::ScoreFuser;
pub use pipeline::{Evaluation, Outcome, RelevancePipeline, ResumeProfile, RunSummary};
pub use runner::score_concurrently;
pub use source::{MemorySink, VecJobSource};
pub use taxonomy::CanonicalTaxonomy;
