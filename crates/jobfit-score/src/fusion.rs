//! Weighted fusion of keyword coverage and chunk similarity into a verdict.

use jobfit_core::config::ScoringConfig;
use jobfit_core::types::ScoreResult;
use jobfit_core::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreFuser {
    similarity_weight: f32,
    tech_score_weight: f32,
    acceptance_threshold: f32,
}

impl ScoreFuser {
    /// Validates the weights and threshold the same way the loaded config is.
    pub fn new(similarity_weight: f32, tech_score_weight: f32, acceptance_threshold: f32) -> Result<Self> {
        let cfg = ScoringConfig { similarity_weight, tech_score_weight, acceptance_threshold, ..ScoringConfig::default() };
        Self::from_config(&cfg)
    }

    pub fn from_config(cfg: &ScoringConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            similarity_weight: cfg.similarity_weight,
            tech_score_weight: cfg.tech_score_weight,
            acceptance_threshold: cfg.acceptance_threshold,
        })
    }

    /// Share of job keywords covered by matched résumé keywords; 0 for an
    /// empty job set.
    pub fn tech_score(matched: usize, jd_keywords: usize) -> f32 {
        if jd_keywords == 0 {
            return 0.0;
        }
        (matched as f32 / jd_keywords as f32).min(1.0)
    }

    pub fn fuse(&self, matched: usize, jd_keywords: usize, max_chunk_similarity: f32) -> ScoreResult {
        let tech_score = Self::tech_score(matched, jd_keywords);
        let max_chunk_similarity = max_chunk_similarity.clamp(0.0, 1.0);
        let final_score = (self.similarity_weight * max_chunk_similarity + self.tech_score_weight * tech_score).clamp(0.0, 1.0);
        ScoreResult { tech_score, max_chunk_similarity, final_score, passed: final_score >= self.acceptance_threshold }
    }
}

impl Default for ScoreFuser {
    fn default() -> Self {
        let cfg = ScoringConfig::default();
        Self {
            similarity_weight: cfg.similarity_weight,
            tech_score_weight: cfg.tech_score_weight,
            acceptance_threshold: cfg.acceptance_threshold,
        }
    }
}
