//! Keyword extraction strategies.
//!
//! [`StructuredExtractor`] parses the text, proposes noun chunks and nouns, and
//! keeps the canonical labels they normalize to. [`PhraseRankingExtractor`]
//! ranks n-gram phrases and keeps the phrases themselves when they resemble
//! some canonical skill.

use std::sync::Arc;

use jobfit_core::config::{ExtractionConfig, ExtractionStrategy, ScoringConfig};
use jobfit_core::normalize::clean_text;
use jobfit_core::traits::{embed_checked, Embedder, KeywordExtractor, PhraseRanker, SyntacticParser};
use jobfit_core::types::{KeywordSet, ParsedText};
use jobfit_core::{Error, Result};
use jobfit_text::{EmbeddingPhraseRanker, RuleBasedParser};

use crate::taxonomy::CanonicalTaxonomy;

pub const DEFAULT_MAX_NOUN_CHUNK_CHARS: usize = 40;

pub struct StructuredExtractor {
    parser: Arc<dyn SyntacticParser>,
    taxonomy: Arc<CanonicalTaxonomy>,
    threshold: f32,
    max_chunk_chars: usize,
}

impl StructuredExtractor {
    pub fn new(parser: Arc<dyn SyntacticParser>, taxonomy: Arc<CanonicalTaxonomy>, threshold: f32) -> Self {
        Self { parser, taxonomy, threshold, max_chunk_chars: DEFAULT_MAX_NOUN_CHUNK_CHARS }
    }

    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars;
        self
    }

    /// Lowercased noun chunks of 1 to `max_chunk_chars` characters, plus every
    /// noun or proper noun that is not a stop word.
    pub fn candidates(&self, parsed: &ParsedText) -> KeywordSet {
        let mut out = KeywordSet::new();
        for chunk in &parsed.noun_chunks {
            let phrase = chunk.trim().to_lowercase();
            if (1..=self.max_chunk_chars).contains(&phrase.chars().count()) {
                out.insert(phrase);
            }
        }
        for token in &parsed.tokens {
            if token.pos.is_nominal() && !token.is_stop {
                out.insert(token.text.to_lowercase());
            }
        }
        out
    }
}

impl KeywordExtractor for StructuredExtractor {
    fn name(&self) -> &'static str {
        "structured"
    }

    fn extract(&self, text: &str) -> Result<KeywordSet> {
        if text.trim().is_empty() {
            return Ok(KeywordSet::new());
        }
        let parsed = self.parser.parse(text).map_err(|e| Error::extraction(&e))?;
        let candidates: Vec<String> = self.candidates(&parsed).into_iter().collect();
        let resolved = self.taxonomy.resolve_many(&candidates, self.threshold)?;
        let labels: KeywordSet = resolved.into_iter().flatten().map(|m| m.label).collect();
        tracing::debug!(candidates = candidates.len(), labels = labels.len(), "structured keywords extracted");
        Ok(labels)
    }
}

pub struct PhraseRankingExtractor {
    ranker: Arc<dyn PhraseRanker>,
    taxonomy: Arc<CanonicalTaxonomy>,
    top_n: usize,
    ngram_range: (usize, usize),
    filter_threshold: f32,
}

impl PhraseRankingExtractor {
    pub fn new(ranker: Arc<dyn PhraseRanker>, taxonomy: Arc<CanonicalTaxonomy>, cfg: &ExtractionConfig) -> Self {
        Self {
            ranker,
            taxonomy,
            top_n: cfg.top_n,
            ngram_range: (cfg.ngram_min, cfg.ngram_max),
            filter_threshold: cfg.filter_threshold,
        }
    }
}

impl KeywordExtractor for PhraseRankingExtractor {
    fn name(&self) -> &'static str {
        "phrase_ranking"
    }

    fn extract(&self, text: &str) -> Result<KeywordSet> {
        let clean = clean_text(text);
        if clean.is_empty() {
            return Ok(KeywordSet::new());
        }
        let ranked = self
            .ranker
            .extract_phrases(&clean, self.ngram_range, self.top_n)
            .map_err(|e| Error::extraction(&e))?;
        if ranked.is_empty() {
            return Ok(KeywordSet::new());
        }
        let phrases: Vec<String> = ranked.into_iter().map(|p| p.phrase).collect();
        let embeddings = embed_checked(self.taxonomy.embedder().as_ref(), &phrases)?;

        let mut kept = KeywordSet::new();
        for (phrase, embedding) in phrases.iter().zip(&embeddings) {
            // Strictly above the threshold; the phrase is kept, not the label.
            if self.taxonomy.best_similarity(embedding).is_some_and(|s| s > self.filter_threshold) {
                kept.insert(phrase.to_lowercase());
            }
        }
        tracing::debug!(ranked = phrases.len(), kept = kept.len(), "ranked phrases filtered against taxonomy");
        Ok(kept)
    }
}

/// The extractor selected by `extraction.strategy`, wired to the built-in parser
/// or phrase ranker.
pub fn build_extractor(
    extraction: &ExtractionConfig,
    scoring: &ScoringConfig,
    taxonomy: Arc<CanonicalTaxonomy>,
    embedder: Arc<dyn Embedder>,
) -> Arc<dyn KeywordExtractor> {
    match extraction.strategy {
        ExtractionStrategy::Structured => Arc::new(
            StructuredExtractor::new(Arc::new(RuleBasedParser::new()), taxonomy, scoring.normalization_threshold)
                .with_max_chunk_chars(extraction.max_noun_chunk_chars),
        ),
        ExtractionStrategy::PhraseRanking => {
            Arc::new(PhraseRankingExtractor::new(Arc::new(EmbeddingPhraseRanker::new(embedder)), taxonomy, extraction))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobfit_core::types::{PartOfSpeech, RankedPhrase, TaggedToken};

    /// Unit vectors per known word; anything else points along the last axis.
    struct WordEmbedder;

    impl WordEmbedder {
        fn vector(text: &str) -> Vec<f32> {
            match text {
                "react" | "reactjs" | "react.js" | "react framework" => vec![1.0, 0.0, 0.0, 0.0],
                "docker" | "docker containers" => vec![0.0, 1.0, 0.0, 0.0],
                "kubernetes" => vec![0.0, 0.0, 1.0, 0.0],
                "k8s clusters" => vec![0.0, 0.6, 0.8, 0.0],
                _ => vec![0.0, 0.0, 0.0, 1.0],
            }
        }
    }

    impl Embedder for WordEmbedder {
        fn embedder_id(&self) -> &str { "test:word" }
        fn dim(&self) -> usize { 4 }
        fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| Self::vector(t)).collect())
        }
    }

    struct FixedParser(ParsedText);

    impl SyntacticParser for FixedParser {
        fn parse(&self, _text: &str) -> anyhow::Result<ParsedText> { Ok(self.0.clone()) }
    }

    struct BrokenParser;

    impl SyntacticParser for BrokenParser {
        fn parse(&self, _text: &str) -> anyhow::Result<ParsedText> { anyhow::bail!("parser timed out") }
    }

    struct FixedRanker(Vec<&'static str>);

    impl PhraseRanker for FixedRanker {
        fn extract_phrases(&self, _text: &str, _range: (usize, usize), top_n: usize) -> anyhow::Result<Vec<RankedPhrase>> {
            Ok(self.0.iter().take(top_n).map(|p| RankedPhrase { phrase: (*p).to_string(), score: 0.5 }).collect())
        }
    }

    fn taxonomy() -> Arc<CanonicalTaxonomy> {
        Arc::new(CanonicalTaxonomy::build(&["react", "docker", "kubernetes"], Arc::new(WordEmbedder)).expect("taxonomy"))
    }

    fn token(text: &str, pos: PartOfSpeech, is_stop: bool) -> TaggedToken {
        TaggedToken { text: text.to_string(), pos, is_stop }
    }

    #[test]
    fn structured_candidates_cover_chunks_and_nouns() {
        let parsed = ParsedText {
            noun_chunks: vec!["React framework".into(), "x".repeat(41)],
            tokens: vec![
                token("React", PartOfSpeech::ProperNoun, false),
                token("framework", PartOfSpeech::Noun, false),
                token("using", PartOfSpeech::Verb, true),
                token("something", PartOfSpeech::Noun, true),
            ],
        };
        let extractor = StructuredExtractor::new(Arc::new(FixedParser(parsed.clone())), taxonomy(), 0.6);
        let candidates: Vec<String> = extractor.candidates(&parsed).into_iter().collect();
        assert_eq!(candidates, vec!["framework", "react", "react framework"]);
    }

    #[test]
    fn structured_output_is_canonical_labels() {
        let parsed = ParsedText {
            noun_chunks: vec!["React framework".into(), "docker containers".into()],
            tokens: vec![
                token("ReactJS", PartOfSpeech::ProperNoun, false),
                token("React.js", PartOfSpeech::ProperNoun, false),
                token("team", PartOfSpeech::Noun, false),
            ],
        };
        let extractor = StructuredExtractor::new(Arc::new(FixedParser(parsed)), taxonomy(), 0.6);
        let labels: Vec<String> = extractor.extract("anything").expect("extract").into_iter().collect();
        assert_eq!(labels, vec!["docker", "react"]);
    }

    #[test]
    fn structured_empty_text_is_empty_set() {
        let extractor = StructuredExtractor::new(Arc::new(BrokenParser), taxonomy(), 0.6);
        assert!(extractor.extract("   ").expect("empty").is_empty());
    }

    #[test]
    fn parser_failure_is_an_extraction_error() {
        let extractor = StructuredExtractor::new(Arc::new(BrokenParser), taxonomy(), 0.6);
        let err = extractor.extract("Senior React developer").expect_err("broken parser");
        assert!(matches!(err, Error::Extraction(msg) if msg.contains("timed out")));
    }

    #[test]
    fn phrase_ranking_keeps_phrases_above_threshold() {
        let ranker = FixedRanker(vec!["react framework", "k8s clusters", "team player", "docker"]);
        let extractor = PhraseRankingExtractor::new(Arc::new(ranker), taxonomy(), &ExtractionConfig::default());
        let kept: Vec<String> = extractor.extract("React framework, k8s clusters").expect("extract").into_iter().collect();
        // k8s clusters peaks at 0.8 against kubernetes; team player is orthogonal.
        assert_eq!(kept, vec!["docker", "k8s clusters", "react framework"]);
    }

    #[test]
    fn phrase_ranking_threshold_is_strict() {
        // "docker" matches its label with similarity exactly 1.0.
        let cfg = ExtractionConfig { filter_threshold: 1.0, ..ExtractionConfig::default() };
        let extractor = PhraseRankingExtractor::new(Arc::new(FixedRanker(vec!["docker"])), taxonomy(), &cfg);
        assert!(extractor.extract("docker").expect("extract").is_empty());
    }

    #[test]
    fn phrase_ranking_of_symbol_only_text_is_empty() {
        let extractor = PhraseRankingExtractor::new(Arc::new(FixedRanker(vec!["react"])), taxonomy(), &ExtractionConfig::default());
        assert!(extractor.extract("!!! ••• ???").expect("extract").is_empty());
    }

    #[test]
    fn build_extractor_follows_strategy() {
        let embedder: Arc<dyn Embedder> = Arc::new(WordEmbedder);
        let scoring = ScoringConfig::default();
        let structured = build_extractor(&ExtractionConfig::default(), &scoring, taxonomy(), Arc::clone(&embedder));
        assert_eq!(structured.name(), "structured");
        let cfg = ExtractionConfig { strategy: ExtractionStrategy::PhraseRanking, ..ExtractionConfig::default() };
        assert_eq!(build_extractor(&cfg, &scoring, taxonomy(), embedder).name(), "phrase_ranking");
    }
}
