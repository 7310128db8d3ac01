//! The canonical skill taxonomy: a fixed label list embedded once at startup.
//!
//! Every lookup is an arg-max over the labels in list order, so equal
//! similarities resolve to the earlier label.

use std::sync::Arc;

use jobfit_core::config::validate_labels;
use jobfit_core::similarity::{cosine_similarity, first_argmax};
use jobfit_core::traits::{embed_checked, Embedder};
use jobfit_core::types::{CanonicalSkill, SkillMatch};
use jobfit_core::{Error, Result};

pub struct CanonicalTaxonomy {
    skills: Vec<CanonicalSkill>,
    embedder: Arc<dyn Embedder>,
}

impl CanonicalTaxonomy {
    /// Embeds every label in one batch. Empty, blank or duplicate labels are a
    /// configuration error.
    pub fn build<S: AsRef<str>>(labels: &[S], embedder: Arc<dyn Embedder>) -> Result<Self> {
        validate_labels(labels)?;
        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        let embeddings = embed_checked(embedder.as_ref(), &labels)?;
        let skills: Vec<CanonicalSkill> = labels
            .into_iter()
            .zip(embeddings)
            .map(|(label, embedding)| CanonicalSkill { label, embedding })
            .collect();
        tracing::info!(labels = skills.len(), embedder = embedder.embedder_id(), "canonical taxonomy embedded");
        Ok(Self { skills, embedder })
    }

    pub fn skills(&self) -> &[CanonicalSkill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    fn exact(&self, text: &str) -> Option<&CanonicalSkill> {
        self.skills.iter().find(|s| s.label == text)
    }

    /// Highest similarity between `embedding` and any label, if the taxonomy
    /// produced a comparable score.
    pub fn best_similarity(&self, embedding: &[f32]) -> Option<f32> {
        self.best(embedding).map(|(_, sim)| sim)
    }

    fn best(&self, embedding: &[f32]) -> Option<(usize, f32)> {
        first_argmax(self.skills.iter().map(|s| cosine_similarity(embedding, &s.embedding)))
    }

    /// Nearest label for a precomputed embedding, when it reaches `threshold`.
    pub fn nearest_for_embedding(&self, embedding: &[f32], threshold: f32) -> Option<SkillMatch> {
        let (idx, similarity) = self.best(embedding)?;
        (similarity >= threshold).then(|| SkillMatch { label: self.skills[idx].label.clone(), similarity })
    }

    /// Nearest canonical label for `text`. A text that is itself a label maps
    /// to that label with similarity 1.0.
    pub fn nearest_skill(&self, text: &str, threshold: f32) -> Result<Option<SkillMatch>> {
        if let Some(skill) = self.exact(text) {
            return Ok((threshold <= 1.0).then(|| SkillMatch { label: skill.label.clone(), similarity: 1.0 }));
        }
        let embedding = embed_checked(self.embedder.as_ref(), &[text.to_string()])?
            .pop()
            .ok_or_else(|| Error::Embedding(format!("no vector for '{text}'")))?;
        Ok(self.nearest_for_embedding(&embedding, threshold))
    }

    /// [`Self::nearest_skill`] for many texts, embedding the non-label ones in a
    /// single batch. Results line up with `texts`.
    pub fn resolve_many(&self, texts: &[String], threshold: f32) -> Result<Vec<Option<SkillMatch>>> {
        let pending: Vec<String> = texts.iter().filter(|t| self.exact(t).is_none()).cloned().collect();
        let mut embedded = if pending.is_empty() {
            Vec::new()
        } else {
            embed_checked(self.embedder.as_ref(), &pending)?
        };
        embedded.reverse();

        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let resolved = match self.exact(text) {
                Some(skill) => (threshold <= 1.0).then(|| SkillMatch { label: skill.label.clone(), similarity: 1.0 }),
                None => {
                    let embedding = embedded.pop().ok_or_else(|| Error::Embedding("candidate embeddings exhausted".into()))?;
                    self.nearest_for_embedding(&embedding, threshold)
                }
            };
            out.push(resolved);
        }
        Ok(out)
    }
}
