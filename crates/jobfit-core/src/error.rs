use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Fatal at startup: empty taxonomy, bad weights, out-of-range thresholds.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The parser or phrase ranker could not process a text.
    #[error("Keyword extraction failed: {0}")]
    Extraction(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Result sink failed: {0}")]
    Sink(String),
}

impl Error {
    /// Wraps an embedding capability failure, keeping the full cause chain.
    pub fn embedding(err: &anyhow::Error) -> Self {
        Self::Embedding(format!("{err:#}"))
    }

    pub fn extraction(err: &anyhow::Error) -> Self {
        Self::Extraction(format!("{err:#}"))
    }

    /// Whether this error only affects the posting being scored.
    pub fn is_posting_local(&self) -> bool {
        matches!(self, Self::Extraction(_) | Self::Embedding(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
