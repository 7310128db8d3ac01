//! Asymmetric fuzzy overlap between two keyword sets.

use jobfit_core::similarity::cosine_similarity;
use jobfit_core::traits::{embed_checked, Embedder};
use jobfit_core::types::KeywordSet;
use jobfit_core::Result;

/// A keyword set together with one embedding per keyword, in set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedKeywords {
    keywords: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

impl EmbeddedKeywords {
    /// Embeds every keyword in one batch; an empty set never reaches the embedder.
    pub fn embed(set: &KeywordSet, embedder: &dyn Embedder) -> Result<Self> {
        let keywords: Vec<String> = set.iter().cloned().collect();
        if keywords.is_empty() {
            return Ok(Self::default());
        }
        let embeddings = embed_checked(embedder, &keywords)?;
        Ok(Self { keywords, embeddings })
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &Vec<f32>)> {
        self.keywords.iter().zip(&self.embeddings)
    }
}

/// Keywords of `a` with some keyword of `b` strictly above `threshold`.
///
/// Scanning `b` stops at the first hit. The result is always a subset of `a`
/// and is empty when `b` is.
pub fn fuzzy_match_embedded(a: &EmbeddedKeywords, b: &EmbeddedKeywords, threshold: f32) -> KeywordSet {
    if b.is_empty() {
        return KeywordSet::new();
    }
    a.iter()
        .filter(|(_, va)| b.embeddings.iter().any(|vb| cosine_similarity(va, vb) > threshold))
        .map(|(kw, _)| kw.clone())
        .collect()
}

pub fn fuzzy_match(a: &KeywordSet, b: &KeywordSet, threshold: f32, embedder: &dyn Embedder) -> Result<KeywordSet> {
    if a.is_empty() || b.is_empty() {
        return Ok(KeywordSet::new());
    }
    let a = EmbeddedKeywords::embed(a, embedder)?;
    let b = EmbeddedKeywords::embed(b, embedder)?;
    Ok(fuzzy_match_embedded(&a, &b, threshold))
}
