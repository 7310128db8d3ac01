//! Domain types shared by the extraction, matching and scoring crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A deduplicated set of lowercase keywords.
///
/// Ordered so that iteration, logging and matching are reproducible run to run.
pub type KeywordSet = BTreeSet<String>;

/// One entry of the reference skill vocabulary together with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalSkill {
    pub label: String,
    pub embedding: Vec<f32>,
}

/// A canonical label selected for a piece of text, with the similarity that won.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillMatch {
    pub label: String,
    pub similarity: f32,
}

/// A word window of a longer text.
///
/// - `index`: position of the window within the source, starting at 0
/// - `words`: the window's words, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub index: usize,
    pub words: Vec<String>,
}

impl TextChunk {
    /// The window rendered as a single space-separated string.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedChunk {
    pub chunk: TextChunk,
    pub embedding: Vec<f32>,
}

/// The scored verdict for one posting. All scores lie in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub tech_score: f32,
    pub max_chunk_similarity: f32,
    pub final_score: f32,
    pub passed: bool,
}

/// A job posting as delivered by a listing source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub identifier: String,
    #[serde(alias = "description")]
    pub description_text: String,
}

impl JobPosting {
    pub fn new(identifier: impl Into<String>, description_text: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), description_text: description_text.into() }
    }
}

/// Coarse part-of-speech classes, named after the universal tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Auxiliary,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Adposition,
    Conjunction,
    Numeral,
    Particle,
    Punctuation,
    Other,
}

impl PartOfSpeech {
    pub fn is_nominal(self) -> bool {
        matches!(self, Self::Noun | Self::ProperNoun)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub pos: PartOfSpeech,
    pub is_stop: bool,
}

/// Output of a syntactic parse: noun-phrase chunks plus every tagged token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedText {
    pub noun_chunks: Vec<String>,
    pub tokens: Vec<TaggedToken>,
}

/// A candidate phrase with its relevance score; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPhrase {
    pub phrase: String,
    pub score: f32,
}
