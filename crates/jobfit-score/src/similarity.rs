//! Chunk-level semantic similarity between two texts.

use jobfit_core::normalize::chunk_text;
use jobfit_core::similarity::cosine_similarity;
use jobfit_core::traits::{embed_checked, Embedder};
use jobfit_core::types::EmbeddedChunk;
use jobfit_core::Result;

/// Splits already-cleaned `text` into word windows and embeds them in one batch.
pub fn embed_chunks(text: &str, max_words: usize, embedder: &dyn Embedder) -> Result<Vec<EmbeddedChunk>> {
    let chunks = chunk_text(text, max_words);
    if chunks.is_empty() {
        return Ok(Vec::new());
    }
    let texts: Vec<String> = chunks.iter().map(|c| c.text()).collect();
    let embeddings = embed_checked(embedder, &texts)?;
    Ok(chunks
        .into_iter()
        .zip(embeddings)
        .map(|(chunk, embedding)| EmbeddedChunk { chunk, embedding })
        .collect())
}

/// Best cosine similarity over every pair of chunks, clamped to `[0, 1]`.
/// Zero when either side has no chunks.
pub fn max_chunk_similarity(left: &[EmbeddedChunk], right: &[EmbeddedChunk]) -> f32 {
    let mut best: Option<f32> = None;
    for l in left {
        for r in right {
            let sim = cosine_similarity(&l.embedding, &r.embedding);
            if best.map_or(true, |b| sim > b) {
                best = Some(sim);
            }
        }
    }
    best.unwrap_or(0.0).clamp(0.0, 1.0)
}
