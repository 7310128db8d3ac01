//! Per-posting evaluation and the sequential run loop.
//!
//! The résumé side (keywords, their embeddings, chunk embeddings) is computed
//! once into a [`ResumeProfile`] and only read afterwards, so a pipeline can be
//! shared across worker threads behind an `Arc`.

use std::sync::Arc;

use jobfit_core::config::{AppConfig, ScoringConfig};
use jobfit_core::normalize::clean_text;
use jobfit_core::traits::{Embedder, JobSource, KeywordExtractor, ResultSink};
use jobfit_core::types::{EmbeddedChunk, JobPosting, KeywordSet, ScoreResult};
use jobfit_core::{Error, Result};

use crate::extract::build_extractor;
use crate::fusion::ScoreFuser;
use crate::matcher::{fuzzy_match_embedded, EmbeddedKeywords};
use crate::similarity::{embed_chunks, max_chunk_similarity};
use crate::taxonomy::CanonicalTaxonomy;

#[derive(Debug, Clone)]
pub struct ResumeProfile {
    keywords: KeywordSet,
    embedded_keywords: EmbeddedKeywords,
    chunks: Vec<EmbeddedChunk>,
}

impl ResumeProfile {
    pub fn build(text: &str, extractor: &dyn KeywordExtractor, embedder: &dyn Embedder, max_words: usize) -> Result<Self> {
        let keywords = extractor.extract(text)?;
        let embedded_keywords = EmbeddedKeywords::embed(&keywords, embedder)?;
        let chunks = embed_chunks(&clean_text(text), max_words, embedder)?;
        tracing::info!(keywords = keywords.len(), chunks = chunks.len(), "résumé profile built");
        Ok(Self { keywords, embedded_keywords, chunks })
    }

    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn chunks(&self) -> &[EmbeddedChunk] {
        &self.chunks
    }
}

/// Everything computed for one posting.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub identifier: String,
    pub score: ScoreResult,
    pub jd_keywords: KeywordSet,
    /// Résumé keywords covered by some job keyword.
    pub matched_keywords: KeywordSet,
    pub resume_chunks: usize,
    pub jd_chunks: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Scored(Evaluation),
    Skipped { identifier: String, reason: String },
}

impl Outcome {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Scored(e) => &e.identifier,
            Self::Skipped { identifier, .. } => identifier,
        }
    }

    /// Skipped postings never pass.
    pub fn passed(&self) -> bool {
        matches!(self, Self::Scored(e) if e.score.passed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub evaluated: usize,
    pub passed: usize,
    pub skipped: usize,
    /// Entries the source could not produce at all.
    pub source_errors: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Scored(e) => {
                self.evaluated += 1;
                if e.score.passed {
                    self.passed += 1;
                }
            }
            Outcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

pub struct RelevancePipeline {
    embedder: Arc<dyn Embedder>,
    extractor: Arc<dyn KeywordExtractor>,
    fuser: ScoreFuser,
    fuzzy_match_threshold: f32,
    max_words_per_chunk: usize,
    resume: ResumeProfile,
}

impl RelevancePipeline {
    /// Validates `scoring` and builds the résumé profile. Any failure here is
    /// fatal: no posting can be scored without it.
    pub fn new(
        scoring: &ScoringConfig,
        embedder: Arc<dyn Embedder>,
        extractor: Arc<dyn KeywordExtractor>,
        resume_text: &str,
    ) -> Result<Self> {
        let fuser = ScoreFuser::from_config(scoring)?;
        let resume = ResumeProfile::build(resume_text, extractor.as_ref(), embedder.as_ref(), scoring.max_words_per_chunk)?;
        Ok(Self {
            embedder,
            extractor,
            fuser,
            fuzzy_match_threshold: scoring.fuzzy_match_threshold,
            max_words_per_chunk: scoring.max_words_per_chunk,
            resume,
        })
    }

    /// Taxonomy, extractor and pipeline from a loaded configuration.
    pub fn from_config(app: &AppConfig, embedder: Arc<dyn Embedder>, resume_text: &str) -> Result<Self> {
        app.validate()?;
        let taxonomy = Arc::new(CanonicalTaxonomy::build(&app.taxonomy.labels, Arc::clone(&embedder))?);
        let extractor = build_extractor(&app.extraction, &app.scoring, taxonomy, Arc::clone(&embedder));
        tracing::info!(strategy = extractor.name(), "keyword extractor selected");
        Self::new(&app.scoring, embedder, extractor, resume_text)
    }

    pub fn resume(&self) -> &ResumeProfile {
        &self.resume
    }

    pub fn extractor(&self) -> &Arc<dyn KeywordExtractor> {
        &self.extractor
    }

    pub fn evaluate(&self, posting: &JobPosting) -> Result<Evaluation> {
        let jd_keywords = self.extractor.extract(&posting.description_text)?;
        let jd_embedded = EmbeddedKeywords::embed(&jd_keywords, self.embedder.as_ref())?;
        let matched_keywords = fuzzy_match_embedded(&self.resume.embedded_keywords, &jd_embedded, self.fuzzy_match_threshold);

        let jd_chunks = embed_chunks(&clean_text(&posting.description_text), self.max_words_per_chunk, self.embedder.as_ref())?;
        let similarity = max_chunk_similarity(&self.resume.chunks, &jd_chunks);

        let score = self.fuser.fuse(matched_keywords.len(), jd_keywords.len(), similarity);
        tracing::debug!(
            id = %posting.identifier,
            max_sim = score.max_chunk_similarity,
            tech_score = score.tech_score,
            final_score = score.final_score,
            matched = ?matched_keywords,
            "posting scored"
        );
        Ok(Evaluation {
            identifier: posting.identifier.clone(),
            score,
            jd_keywords,
            matched_keywords,
            resume_chunks: self.resume.chunks.len(),
            jd_chunks: jd_chunks.len(),
        })
    }

    /// [`Self::evaluate`], turning a failure into a skipped outcome.
    pub fn evaluate_or_skip(&self, posting: &JobPosting) -> Outcome {
        match self.evaluate(posting) {
            Ok(evaluation) => Outcome::Scored(evaluation),
            Err(err) => {
                if err.is_posting_local() {
                    tracing::warn!(id = %posting.identifier, error = %err, "skipping posting");
                } else {
                    tracing::error!(id = %posting.identifier, error = %err, "skipping posting");
                }
                Outcome::Skipped { identifier: posting.identifier.clone(), reason: err.to_string() }
            }
        }
    }

    /// Scores every posting in order and records passing identifiers.
    ///
    /// Per-posting failures are skipped; only sink failures end the run early.
    pub fn run(&self, source: &mut dyn JobSource, sink: &mut dyn ResultSink) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        loop {
            let posting = match source.next_posting() {
                Ok(Some(posting)) => posting,
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(error = %format!("{err:#}"), "job source entry unreadable");
                    summary.source_errors += 1;
                    continue;
                }
            };
            let outcome = self.evaluate_or_skip(&posting);
            deliver(&outcome, sink, &mut summary)?;
        }
        sink.flush().map_err(|e| Error::Sink(format!("{e:#}")))?;
        tracing::info!(?summary, "run finished");
        Ok(summary)
    }
}

/// Records `outcome` in posting order: one verdict line per scored posting,
/// and the identifier to the sink when it passed.
pub(crate) fn deliver(outcome: &Outcome, sink: &mut dyn ResultSink, summary: &mut RunSummary) -> Result<()> {
    summary.record(outcome);
    if let Outcome::Scored(e) = outcome {
        tracing::info!(
            id = %e.identifier,
            final_score = e.score.final_score,
            tech_score = e.score.tech_score,
            max_sim = e.score.max_chunk_similarity,
            passed = e.score.passed,
            "posting verdict"
        );
    }
    if outcome.passed() {
        sink.record(outcome.identifier()).map_err(|e| Error::Sink(format!("{e:#}")))?;
    }
    Ok(())
}
