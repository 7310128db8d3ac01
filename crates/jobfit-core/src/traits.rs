//! Capability interfaces consumed by the scoring core.
//!
//! Implementations live in sibling crates (`jobfit-embed`, `jobfit-text`) or in
//! the application layer; tests substitute in-memory fakes.

use crate::error::Error;
use crate::types::{JobPosting, KeywordSet, ParsedText, RankedPhrase};

pub trait Embedder: Send + Sync {
    /// Stable identifier of the model behind this embedder (e.g. `bert:all-MiniLM-L6-v2:d384`).
    fn embedder_id(&self) -> &str;
    /// Embedding dimensionality.
    fn dim(&self) -> usize;
    /// Compute embeddings for a batch of input texts, one vector per text, in order.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector for a single input"))
    }
}

/// `embed_batch` with the output shape checked: one vector per text, each
/// exactly `dim()` long. Any violation is an embedding failure.
pub fn embed_checked(embedder: &dyn Embedder, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
    let vectors = embedder.embed_batch(texts).map_err(|e| Error::embedding(&e))?;
    if vectors.len() != texts.len() {
        return Err(Error::Embedding(format!(
            "{} returned {} vectors for {} texts",
            embedder.embedder_id(),
            vectors.len(),
            texts.len()
        )));
    }
    let dim = embedder.dim();
    if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
        return Err(Error::Embedding(format!(
            "{} returned a {}-dimensional vector, expected {dim}",
            embedder.embedder_id(),
            bad.len()
        )));
    }
    Ok(vectors)
}

pub trait SyntacticParser: Send + Sync {
    fn parse(&self, text: &str) -> anyhow::Result<ParsedText>;
}

pub trait PhraseRanker: Send + Sync {
    /// Up to `top_n` phrases of `ngram_range.0..=ngram_range.1` words, best first.
    fn extract_phrases(
        &self,
        text: &str,
        ngram_range: (usize, usize),
        top_n: usize,
    ) -> anyhow::Result<Vec<RankedPhrase>>;
}

/// Turns free text into a keyword set. Empty text yields an empty set.
pub trait KeywordExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, text: &str) -> crate::error::Result<KeywordSet>;
}

/// A finite, non-restartable stream of postings.
pub trait JobSource {
    /// The next posting, `Ok(None)` once exhausted. An `Err` concerns one
    /// entry only; the source stays usable afterwards.
    fn next_posting(&mut self) -> anyhow::Result<Option<JobPosting>>;
}

/// Receives the identifiers of accepted postings, in evaluation order.
pub trait ResultSink {
    fn record(&mut self, identifier: &str) -> anyhow::Result<()>;

    fn flush(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Claims `dim` but returns `len`-long vectors, optionally dropping the last one.
    struct Shaped {
        dim: usize,
        len: usize,
        drop_last: bool,
    }

    impl Embedder for Shaped {
        fn embedder_id(&self) -> &str { "test:shaped" }
        fn dim(&self) -> usize { self.dim }
        fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            let mut out = vec![vec![1.0; self.len]; texts.len()];
            if self.drop_last {
                out.pop();
            }
            Ok(out)
        }
    }

    fn texts() -> Vec<String> {
        vec!["react".into(), "docker".into()]
    }

    #[test]
    fn well_shaped_batches_pass_through() {
        let vectors = embed_checked(&Shaped { dim: 3, len: 3, drop_last: false }, &texts()).expect("embed");
        assert_eq!(vectors.len(), 2);
    }

    #[test]
    fn wrong_dimension_is_an_embedding_failure() {
        let err = embed_checked(&Shaped { dim: 3, len: 2, drop_last: false }, &texts()).expect_err("dim");
        assert!(matches!(&err, Error::Embedding(msg) if msg.contains("2-dimensional")), "{err}");
        assert!(err.is_posting_local());
    }

    #[test]
    fn missing_vectors_are_an_embedding_failure() {
        let err = embed_checked(&Shaped { dim: 3, len: 3, drop_last: true }, &texts()).expect_err("count");
        assert!(matches!(err, Error::Embedding(msg) if msg.contains("1 vectors for 2 texts")));
    }
}
