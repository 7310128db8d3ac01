//! Phrase ranking by embedding similarity to the whole document.
//!
//! Candidates are the distinct n-grams of the document's content words; each
//! is scored by cosine similarity between its embedding and the document
//! embedding, and the best `top_n` are returned.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{ensure, Result};
use tantivy::tokenizer::TextAnalyzer;

use jobfit_core::similarity::cosine_similarity;
use jobfit_core::traits::{Embedder, PhraseRanker};
use jobfit_core::types::RankedPhrase;

use crate::analyzer::{candidate_analyzer, content_words};

pub struct EmbeddingPhraseRanker {
    embedder: Arc<dyn Embedder>,
    analyzer: TextAnalyzer,
}

impl EmbeddingPhraseRanker {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder, analyzer: candidate_analyzer() }
    }

    /// Distinct n-grams for `n` in `min..=max`, in first-occurrence order.
    pub fn candidates(&self, text: &str, (min, max): (usize, usize)) -> Vec<String> {
        let mut analyzer = self.analyzer.clone();
        let words = content_words(&mut analyzer, text);
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for n in min.max(1)..=max {
            for window in words.windows(n) {
                let phrase = window.join(" ");
                if seen.insert(phrase.clone()) {
                    out.push(phrase);
                }
            }
        }
        out
    }
}

impl PhraseRanker for EmbeddingPhraseRanker {
    fn extract_phrases(&self, text: &str, ngram_range: (usize, usize), top_n: usize) -> Result<Vec<RankedPhrase>> {
        let candidates = self.candidates(text, ngram_range);
        if candidates.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }
        let doc_vec = self.embedder.embed(text)?;
        let cand_vecs = self.embedder.embed_batch(&candidates)?;
        ensure!(cand_vecs.len() == candidates.len(), "embedder returned {} vectors for {} phrases", cand_vecs.len(), candidates.len());

        let mut ranked: Vec<RankedPhrase> = candidates
            .into_iter()
            .zip(&cand_vecs)
            .map(|(phrase, v)| RankedPhrase { score: cosine_similarity(&doc_vec, v), phrase })
            .collect();
        // Stable: equal scores keep first-occurrence order.
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_n);
        tracing::debug!(phrases = ranked.len(), "ranked candidate phrases");
        Ok(ranked)
    }
}
