use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use jobfit_cli::cli::{Cli, Command};
use jobfit_cli::sink::CsvSink;
use jobfit_cli::sources::open_source;
use jobfit_core::config::{AppConfig, Config};
use jobfit_core::traits::{Embedder, JobSource};
use jobfit_core::types::JobPosting;
use jobfit_embed::get_default_embedder;
use jobfit_score::{build_extractor, score_concurrently, CanonicalTaxonomy, RelevancePipeline};

/// Ticks a progress bar for every entry pulled from the wrapped source.
struct Progress {
    inner: Box<dyn JobSource + Send>,
    bar: ProgressBar,
}

impl JobSource for Progress {
    fn next_posting(&mut self) -> Result<Option<JobPosting>> {
        let next = self.inner.next_posting();
        if !matches!(next, Ok(None)) {
            self.bar.inc(1);
        }
        next
    }
}

/// A command-line path wins; otherwise the configured one, already resolved.
fn required_path(flag: Option<PathBuf>, configured: Option<PathBuf>, name: &str) -> Result<PathBuf> {
    flag.or(configured)
        .with_context(|| format!("no {name} given (pass --{name} or set run.{name}_path)"))
}

fn embedder(app: &AppConfig) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::from(get_default_embedder(&app.embedding)?))
}

fn score(app: &AppConfig, resume: PathBuf, postings: PathBuf, output: PathBuf) -> Result<()> {
    let resume_text = fs::read_to_string(&resume).with_context(|| format!("reading résumé {}", resume.display()))?;
    let pipeline = Arc::new(RelevancePipeline::from_config(app, embedder(app)?, &resume_text)?);
    println!("Résumé keywords: {:?}", pipeline.resume().keywords());

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} postings {msg}")?);
    let mut source = Progress { inner: open_source(&postings)?, bar: bar.clone() };
    let mut sink = CsvSink::open(&output)?;

    let workers = app.run.workers;
    let summary = if workers > 1 {
        tokio::runtime::Runtime::new()?.block_on(score_concurrently(Arc::clone(&pipeline), source, &mut sink, workers))?
    } else {
        pipeline.run(&mut source, &mut sink)?
    };
    bar.finish_and_clear();

    println!(
        "✅ Scored {} postings: {} passed, {} skipped, {} unreadable",
        summary.evaluated, summary.passed, summary.skipped, summary.source_errors
    );
    println!("Matching postings appended to {}", output.display());
    Ok(())
}

fn keywords(app: &AppConfig, file: &Path) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let embedder = embedder(app)?;
    let taxonomy = Arc::new(CanonicalTaxonomy::build(&app.taxonomy.labels, Arc::clone(&embedder))?);
    let extractor = build_extractor(&app.extraction, &app.scoring, taxonomy, embedder);
    let keywords = extractor.extract(&text)?;
    println!("{} keywords ({}):", keywords.len(), extractor.name());
    for kw in &keywords {
        println!("  {kw}");
    }
    Ok(())
}

fn normalize(app: &AppConfig, text: &str, threshold: f32) -> Result<()> {
    let taxonomy = CanonicalTaxonomy::build(&app.taxonomy.labels, embedder(app)?)?;
    match taxonomy.nearest_skill(text, threshold)? {
        Some(m) => println!("{text} -> {} ({:.3})", m.label, m.similarity),
        None => println!("{text} -> no canonical skill at threshold {threshold}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,jobfit_core=info,jobfit_embed=info,jobfit_text=info,jobfit_score=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let mut app = config.app()?;
    cli.apply_globals(&mut app);

    match cli.cmd {
        Command::Score { resume, postings, output, workers, strategy } => {
            if let Some(workers) = workers {
                app.run.workers = workers.max(1);
            }
            if let Some(strategy) = strategy {
                app.extraction.strategy = strategy.into();
            }
            let configured = app.run.resolve(config.base_dir());
            let resume = required_path(resume, configured.resume, "resume")?;
            let postings = required_path(postings, configured.postings, "postings")?;
            let output = output.unwrap_or(configured.output);
            score(&app, resume, postings, output)
        }
        Command::Keywords { file, strategy } => {
            if let Some(strategy) = strategy {
                app.extraction.strategy = strategy.into();
            }
            keywords(&app, &file)
        }
        Command::Normalize { text, threshold } => {
            let threshold = threshold.unwrap_or(app.scoring.normalization_threshold);
            normalize(&app, &text, threshold)
        }
    }
}
