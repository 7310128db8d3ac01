use tantivy::tokenizer::{LowerCaser, RemoveLongFilter, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};

use crate::stopwords;

/// Tokens longer than this are markup or hashes, never skills.
const MAX_TOKEN_BYTES: usize = 40;

/// Lowercasing, stop-word-free word tokenizer used to build phrase candidates.
pub fn candidate_analyzer() -> TextAnalyzer {
	TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(RemoveLongFilter::limit(MAX_TOKEN_BYTES))
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stopwords::ENGLISH.iter().map(|s| s.to_string())))
		.build()
}

/// Content words of `text`, in order. Single-character tokens are dropped.
pub fn content_words(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
	let mut stream = analyzer.token_stream(text);
	let mut words = Vec::new();
	while stream.advance() {
		let token = stream.token();
		if token.text.chars().count() > 1 { words.push(token.text.clone()); }
	}
	words
}
