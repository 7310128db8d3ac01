//! Text cleanup and fixed-size word windowing.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::TextChunk;

pub const DEFAULT_MAX_WORDS_PER_CHUNK: usize = 150;

fn non_semantic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\s.,]").expect("static pattern"))
}

/// Drops everything except ASCII letters and digits, whitespace, commas and
/// periods, collapses whitespace runs to one space, trims and lowercases.
pub fn clean_text(text: &str) -> String {
    let kept = non_semantic().replace_all(text, "");
    kept.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Splits `text` into consecutive, non-overlapping windows of at most
/// `max_words` words. The last window may be shorter; empty text has none.
pub fn chunk_text(text: &str, max_words: usize) -> Vec<TextChunk> {
    let max_words = max_words.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words)
        .enumerate()
        .map(|(index, window)| TextChunk {
            index,
            words: window.iter().map(|w| (*w).to_string()).collect(),
        })
        .collect()
}
