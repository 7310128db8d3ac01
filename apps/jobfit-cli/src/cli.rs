use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use jobfit_core::config::{AppConfig, ExtractionStrategy};

#[derive(Parser, Debug)]
#[command(name = "jobfit")]
#[command(about = "Score job postings against a résumé and keep the relevant ones")]
pub struct Cli {
    /// Use deterministic hashing embeddings instead of loading a model
    #[arg(long, global = true, env = "APP_USE_FAKE_EMBEDDINGS", value_parser = clap::builder::BoolishValueParser::new())]
    pub fake_embeddings: bool,

    /// Directory with config.json, tokenizer.json and model weights
    #[arg(long, global = true)]
    pub model_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score every posting and append passing identifiers to the output file
    Score {
        /// Plain-text résumé
        #[arg(long)]
        resume: Option<PathBuf>,
        /// JSONL file or directory of .txt postings
        #[arg(long)]
        postings: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Postings evaluated at once
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },
    /// Print the keyword set extracted from a text file
    Keywords {
        file: PathBuf,
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,
    },
    /// Print the canonical skill nearest to a phrase
    Normalize {
        text: String,
        #[arg(long)]
        threshold: Option<f32>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    Structured,
    PhraseRanking,
}

impl From<StrategyArg> for ExtractionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Structured => Self::Structured,
            StrategyArg::PhraseRanking => Self::PhraseRanking,
        }
    }
}

impl Cli {
    /// Overlays global flags onto the loaded configuration.
    pub fn apply_globals(&self, app: &mut AppConfig) {
        if self.fake_embeddings {
            app.embedding.use_fake = true;
        }
        if let Some(dir) = &self.model_dir {
            app.embedding.model_dir = Some(dir.display().to_string());
        }
    }
}
