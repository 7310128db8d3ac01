//! Layered configuration and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g. `APP_SCORING__ACCEPTANCE_THRESHOLD`).
//! The TOML files are read from `JOBFIT_CONFIG_DIR` (default: the working
//! directory), and relative `[run]` paths taken from them resolve against that
//! same directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::normalize::DEFAULT_MAX_WORDS_PER_CHUNK;

/// Reference vocabulary of skills, technologies and roles, in tie-break order.
pub const DEFAULT_SKILLS: &[&str] = &[
    "html", "css", "javascript", "typescript", "react", "angular", "vue.js",
    "node.js", "express", "mongodb", "mysql", "postgresql", "redux",
    "rest api", "graphql", "docker", "kubernetes", "aws", "azure", "gcp",
    "devops", "jest", "mocha", "cypress", "next.js", "tailwind", "sass", "php",
    "python", "java", "spring", "flask", "django", "ci/cd", "agile", "scrum",
    "frontend", "frontend developer", "responsive design", "figma",
    "state management", "component-based development", "single page application",
    "user interface", "ux", "design system",
];

const WEIGHT_SUM_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub max_words_per_chunk: usize,
    /// Minimum similarity for a candidate to map onto a canonical skill.
    pub normalization_threshold: f32,
    /// Similarity two keywords must exceed to count as the same concept.
    pub fuzzy_match_threshold: f32,
    pub acceptance_threshold: f32,
    pub similarity_weight: f32,
    pub tech_score_weight: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_words_per_chunk: DEFAULT_MAX_WORDS_PER_CHUNK,
            normalization_threshold: 0.6,
            fuzzy_match_threshold: 0.7,
            acceptance_threshold: 0.6,
            similarity_weight: 0.4,
            tech_score_weight: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Noun chunks and nouns normalized onto canonical labels.
    #[default]
    Structured,
    /// Ranked n-gram phrases kept verbatim when they resemble a canonical skill.
    PhraseRanking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub strategy: ExtractionStrategy,
    pub top_n: usize,
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub filter_threshold: f32,
    pub max_noun_chunk_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategy: ExtractionStrategy::Structured,
            top_n: 100,
            ngram_min: 1,
            ngram_max: 4,
            filter_threshold: 0.6,
            max_noun_chunk_chars: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    pub labels: Vec<String>,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self { labels: DEFAULT_SKILLS.iter().map(|s| (*s).to_string()).collect() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Directory holding `config.json`, `tokenizer.json` and the weights.
    pub model_dir: Option<String>,
    pub max_len: usize,
    pub batch_size: usize,
    pub use_fake: bool,
    pub fake_dim: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { model_dir: None, max_len: 256, batch_size: 32, use_fake: false, fake_dim: 384 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub resume_path: Option<String>,
    pub postings_path: Option<String>,
    pub output_path: String,
    pub workers: usize,
}

/// `[run]` paths after expansion and base-directory resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub resume: Option<PathBuf>,
    pub postings: Option<PathBuf>,
    pub output: PathBuf,
}

impl RunConfig {
    pub fn resolve(&self, base: &Path) -> RunPaths {
        RunPaths {
            resume: self.resume_path.as_ref().map(|p| resolve_with_base(base, p)),
            postings: self.postings_path.as_ref().map(|p| resolve_with_base(base, p)),
            output: resolve_with_base(base, &self.output_path),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            resume_path: None,
            postings_path: None,
            output_path: "matching_jobs.csv".to_string(),
            workers: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub extraction: ExtractionConfig,
    pub taxonomy: TaxonomyConfig,
    pub embedding: EmbeddingConfig,
    pub run: RunConfig,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_words_per_chunk == 0 {
            return Err(Error::InvalidConfig("scoring.max_words_per_chunk must be > 0".into()));
        }
        for (name, value) in [
            ("scoring.normalization_threshold", self.normalization_threshold),
            ("scoring.fuzzy_match_threshold", self.fuzzy_match_threshold),
            ("scoring.acceptance_threshold", self.acceptance_threshold),
            ("scoring.similarity_weight", self.similarity_weight),
            ("scoring.tech_score_weight", self.tech_score_weight),
        ] {
            check_unit_interval(name, value)?;
        }
        let sum = self.similarity_weight + self.tech_score_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidConfig(format!(
                "scoring weights must sum to 1.0 (similarity_weight {} + tech_score_weight {} = {sum})",
                self.similarity_weight, self.tech_score_weight
            )));
        }
        Ok(())
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ngram_min == 0 || self.ngram_min > self.ngram_max {
            return Err(Error::InvalidConfig(format!(
                "extraction ngram range {}..={} is empty",
                self.ngram_min, self.ngram_max
            )));
        }
        if self.max_noun_chunk_chars == 0 {
            return Err(Error::InvalidConfig("extraction.max_noun_chunk_chars must be > 0".into()));
        }
        check_unit_interval("extraction.filter_threshold", self.filter_threshold)
    }
}

impl TaxonomyConfig {
    pub fn validate(&self) -> Result<()> {
        validate_labels(&self.labels)
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.extraction.validate()?;
        self.taxonomy.validate()?;
        if self.embedding.batch_size == 0 || self.embedding.max_len == 0 {
            return Err(Error::InvalidConfig("embedding batch_size and max_len must be > 0".into()));
        }
        if self.run.workers == 0 {
            return Err(Error::InvalidConfig("run.workers must be > 0".into()));
        }
        Ok(())
    }
}

/// Canonical labels must be non-empty, unique and non-blank.
pub fn validate_labels<S: AsRef<str>>(labels: &[S]) -> Result<()> {
    if labels.is_empty() {
        return Err(Error::InvalidConfig("canonical skill list is empty".into()));
    }
    let mut seen = HashSet::new();
    for label in labels {
        let label = label.as_ref();
        if label.trim().is_empty() {
            return Err(Error::InvalidConfig("canonical skill labels must not be blank".into()));
        }
        if !seen.insert(label) {
            return Err(Error::InvalidConfig(format!("duplicate canonical skill label '{label}'")));
        }
    }
    Ok(())
}

fn check_unit_interval(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{name} must be within [0, 1], got {value}")))
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        let base_dir = env::var("JOBFIT_CONFIG_DIR").map(expand_path).unwrap_or_else(|_| PathBuf::from("."));

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        tracing::debug!(env = %env_name, base = %base_dir.display(), "configuration layers merged");

        Ok(Self { figment, base_dir })
    }

    /// Defaults overlaid with an explicit figment, for tests and embedding callers.
    pub fn from_figment(overrides: Figment) -> Self {
        Self {
            figment: Figment::from(Serialized::defaults(AppConfig::default())).merge(overrides),
            base_dir: PathBuf::from("."),
        }
    }

    /// Directory relative `[run]` paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The typed, validated application configuration.
    pub fn app(&self) -> Result<AppConfig> {
        let app: AppConfig = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        app.validate()?;
        Ok(app)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
