//! Rule-based syntactic parser.
//!
//! Tags tokens from closed-class word lists plus suffix heuristics, then groups
//! `determiner? modifier* nominal+` runs into noun chunks. It trades accuracy
//! for having no model to load; every candidate it proposes is filtered again
//! by the skill taxonomy downstream.

use regex::Regex;
use std::sync::OnceLock;

use jobfit_core::traits::SyntacticParser;
use jobfit_core::types::{ParsedText, PartOfSpeech, TaggedToken};

use crate::stopwords::is_stop_word;

const DETERMINERS: &[&str] = &[
    "a", "an", "any", "each", "every", "her", "his", "its", "my", "no", "our", "some", "that",
    "the", "their", "these", "this", "those", "your",
];
const PRONOUNS: &[&str] = &[
    "he", "her", "him", "i", "it", "me", "she", "them", "they", "us", "we", "what", "which", "who",
    "whom", "you",
];
const ADPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "along", "among", "around", "as", "at",
    "before", "behind", "below", "between", "by", "during", "for", "from", "in", "including",
    "inside", "into", "like", "of", "on", "onto", "over", "per", "since", "through", "to", "toward",
    "under", "until", "upon", "via", "with", "within", "without",
];
const CONJUNCTIONS: &[&str] = &[
    "although", "and", "because", "but", "if", "nor", "or", "so", "than", "though", "unless",
    "whereas", "whether", "while", "yet",
];
const AUXILIARIES: &[&str] = &[
    "am", "are", "be", "been", "being", "can", "could", "did", "do", "does", "had", "has", "have",
    "is", "may", "might", "must", "shall", "should", "was", "were", "will", "would",
];
const PARTICLES: &[&str] = &["not", "n't"];
const VERBS: &[&str] = &[
    "apply", "boosting", "build", "building", "built", "collaborate", "create", "creating", "deliver",
    "delivering", "deploy", "deploying", "design", "develop", "developing", "enhance", "ensure",
    "ensuring", "help", "improve", "improving", "join", "lead", "leveraging", "looking",
    "maintain", "maintaining", "manage", "managing", "optimize", "reducing", "seeking",
    "specializing", "support", "using", "work", "working", "write", "writing",
];
const ADJECTIVES: &[&str] = &[
    "basic", "best", "better", "big", "clean", "cloud-native", "cross-functional", "efficient",
    "end-to-end", "excellent", "familiar", "fast", "full", "full-stack", "good", "great", "high",
    "junior", "key", "large", "large-scale", "latest", "lead", "low", "modern", "new", "proficient",
    "robust", "senior", "skilled", "small", "solid", "strong",
];
const ADVERBS: &[&str] = &["also", "very", "well", "alongside", "currently", "highly", "often"];
const ADJECTIVE_SUFFIXES: &[&str] = &["ive", "ous", "ful", "able", "ible", "ical", "less"];

fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\p{L}\p{N}]+(?:['./\-][\p{L}\p{N}]+)*[+#]*|\S").expect("static pattern")
    })
}

#[derive(Debug, Default, Clone)]
pub struct RuleBasedParser;

impl RuleBasedParser {
    pub fn new() -> Self { Self }

    /// Splits `text` into word and punctuation tokens, keeping dotted and
    /// hyphenated technology names (`node.js`, `ci/cd`, `c++`) whole.
    pub fn tokenize(text: &str) -> Vec<&str> {
        token_pattern().find_iter(text).map(|m| m.as_str()).collect()
    }

    pub fn tag(tokens: &[&str]) -> Vec<TaggedToken> {
        tokens
            .iter()
            .enumerate()
            .map(|(i, tok)| {
                let sentence_start = i == 0 || matches!(tokens[i - 1], "." | "!" | "?" | ":" | "•");
                TaggedToken {
                    text: (*tok).to_string(),
                    pos: classify(tok, sentence_start),
                    is_stop: is_stop_word(tok),
                }
            })
            .collect()
    }

    pub fn noun_chunks(tokens: &[TaggedToken]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current: Vec<&TaggedToken> = Vec::new();
        for token in tokens {
            match token.pos {
                PartOfSpeech::Determiner => {
                    flush_chunk(&mut current, &mut chunks);
                    current.push(token);
                }
                PartOfSpeech::Adjective | PartOfSpeech::Numeral => {
                    // A modifier after a nominal starts a new phrase.
                    if current.last().is_some_and(|t| t.pos.is_nominal()) {
                        flush_chunk(&mut current, &mut chunks);
                    }
                    current.push(token);
                }
                PartOfSpeech::Noun | PartOfSpeech::ProperNoun => current.push(token),
                _ => flush_chunk(&mut current, &mut chunks),
            }
        }
        flush_chunk(&mut current, &mut chunks);
        chunks
    }
}

fn flush_chunk(current: &mut Vec<&TaggedToken>, chunks: &mut Vec<String>) {
    while current.last().is_some_and(|t| !t.pos.is_nominal()) {
        current.pop();
    }
    if !current.is_empty() {
        chunks.push(current.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" "));
    }
    current.clear();
}

fn classify(token: &str, sentence_start: bool) -> PartOfSpeech {
    if !token.chars().any(char::is_alphanumeric) {
        return PartOfSpeech::Punctuation;
    }
    let lower = token.to_lowercase();
    let w = lower.as_str();
    if DETERMINERS.contains(&w) { return PartOfSpeech::Determiner; }
    if PRONOUNS.contains(&w) { return PartOfSpeech::Pronoun; }
    if ADPOSITIONS.contains(&w) { return PartOfSpeech::Adposition; }
    if CONJUNCTIONS.contains(&w) { return PartOfSpeech::Conjunction; }
    if AUXILIARIES.contains(&w) { return PartOfSpeech::Auxiliary; }
    if PARTICLES.contains(&w) { return PartOfSpeech::Particle; }
    if w.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',' || c == '%') {
        return PartOfSpeech::Numeral;
    }
    if VERBS.contains(&w) { return PartOfSpeech::Verb; }
    if ADVERBS.contains(&w) { return PartOfSpeech::Adverb; }
    if ADJECTIVES.contains(&w) { return PartOfSpeech::Adjective; }
    if looks_like_proper_noun(token, sentence_start) { return PartOfSpeech::ProperNoun; }
    if w.len() > 4 && w.ends_with("ly") { return PartOfSpeech::Adverb; }
    if w.len() > 4 && w.ends_with("ed") { return PartOfSpeech::Verb; }
    if w.len() > 5 && ADJECTIVE_SUFFIXES.iter().any(|s| w.ends_with(s)) {
        return PartOfSpeech::Adjective;
    }
    PartOfSpeech::Noun
}

/// Capitalized mid-sentence words, acronyms and technology-shaped tokens
/// (`Node.js`, `C#`, `EC2`).
fn looks_like_proper_noun(token: &str, sentence_start: bool) -> bool {
    let has_letter = token.chars().any(char::is_alphabetic);
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    let tech_shape = token.contains(['.', '+', '#']) || (has_letter && has_digit);
    let acronym = token.chars().filter(|c| c.is_alphabetic()).count() > 1
        && token.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
    let capitalized = token.chars().next().is_some_and(char::is_uppercase);
    tech_shape || acronym || (capitalized && !sentence_start)
}

impl SyntacticParser for RuleBasedParser {
    fn parse(&self, text: &str) -> anyhow::Result<ParsedText> {
        let tokens = Self::tag(&Self::tokenize(text));
        let noun_chunks = Self::noun_chunks(&tokens);
        Ok(ParsedText { noun_chunks, tokens })
    }
}
