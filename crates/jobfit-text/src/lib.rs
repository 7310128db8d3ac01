//! jobfit-text
//!
//! Text capabilities behind the keyword extractors: a rule-based syntactic
//! parser, the shared English stop-word list, and an embedding-backed phrase
//! ranker whose candidates come from a tantivy analyzer.
pub mod analyzer;
pub mod parser;
pub mod phrases;
pub mod stopwords;

pub use parser::RuleBasedParser;
pub use phrases::EmbeddingPhraseRanker;
