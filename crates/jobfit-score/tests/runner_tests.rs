mod common;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use common::*;
use jobfit_core::config::AppConfig;
use jobfit_core::traits::{JobSource, ResultSink};
use jobfit_core::types::JobPosting;
use jobfit_embed::FakeEmbedder;
use jobfit_score::{score_concurrently, MemorySink, RelevancePipeline, VecJobSource};

const RESUME_TEXT: &str = "Frontend Developer with five years of React, Redux and TypeScript. \
    Built responsive design systems in Tailwind and Sass, tested with Jest and Cypress, \
    deployed through CI/CD on AWS with Docker.";

fn postings() -> Vec<JobPosting> {
    let bodies = [
        "We need a React developer who knows Redux, TypeScript and Jest.",
        "",
        "Backend engineer: Java, Spring and PostgreSQL on Kubernetes.",
        "Design system work in Figma with a strong user interface focus.",
        "Frontend role: React, Tailwind, Cypress, CI/CD, AWS and Docker.",
        "Line cook wanted for a busy kitchen.",
    ];
    bodies.iter().enumerate().map(|(i, b)| JobPosting::new(format!("https://jobs/{i}"), *b)).collect()
}

fn fake_pipeline() -> Arc<RelevancePipeline> {
    let pipeline = RelevancePipeline::from_config(&AppConfig::default(), Arc::new(FakeEmbedder::new(384)), RESUME_TEXT)
        .expect("pipeline");
    Arc::new(pipeline)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_run_matches_sequential_order() {
    let pipeline = fake_pipeline();

    let mut sequential_sink = MemorySink::default();
    let sequential = pipeline.run(&mut VecJobSource::new(postings()), &mut sequential_sink).expect("sequential");

    for workers in [1, 3, 8] {
        let mut sink = MemorySink::default();
        let summary = score_concurrently(Arc::clone(&pipeline), VecJobSource::new(postings()), &mut sink, workers)
            .await
            .expect("concurrent");
        assert_eq!(summary, sequential, "workers = {workers}");
        assert_eq!(sink, sequential_sink, "workers = {workers}");
    }
}

#[tokio::test]
async fn concurrent_run_skips_failures_in_place() {
    let pipeline = Arc::new(
        RelevancePipeline::new(
            &Default::default(),
            Arc::new(scenario_embedder()),
            Arc::new(scenario_extractor()),
            RESUME,
        )
        .expect("pipeline"),
    );
    let source = FlakySource::new(vec![
        Ok(JobPosting::new("https://jobs/1", "close job")),
        Err("listing page timed out".into()),
        Ok(JobPosting::new("https://jobs/bad", "malformed")),
        Ok(JobPosting::new("https://jobs/2", "close job")),
    ]);
    let mut sink = MemorySink::default();
    let summary = score_concurrently(pipeline, source, &mut sink, 2).await.expect("run");
    assert_eq!(sink.identifiers, vec!["https://jobs/1", "https://jobs/2"]);
    assert_eq!((summary.evaluated, summary.skipped, summary.source_errors), (2, 1, 1));
}

#[derive(Clone, Default)]
struct SharedSink(Arc<Mutex<Vec<String>>>);

impl ResultSink for SharedSink {
    fn record(&mut self, identifier: &str) -> anyhow::Result<()> {
        self.0.lock().map_err(|_| anyhow::anyhow!("poisoned"))?.push(identifier.to_string());
        Ok(())
    }
}

/// Hands out one posting, then blocks until the sink has recorded it.
struct GatedSource {
    sink: SharedSink,
    pulls: usize,
}

impl JobSource for GatedSource {
    fn next_posting(&mut self) -> anyhow::Result<Option<JobPosting>> {
        self.pulls += 1;
        match self.pulls {
            1 => Ok(Some(JobPosting::new("https://jobs/1", "close job"))),
            2 => {
                let deadline = Instant::now() + Duration::from_secs(5);
                while self.sink.0.lock().map_err(|_| anyhow::anyhow!("poisoned"))?.is_empty() {
                    if Instant::now() > deadline {
                        anyhow::bail!("first posting never reached the sink");
                    }
                    std::thread::sleep(Duration::from_millis(5));
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

#[tokio::test]
async fn slow_source_does_not_stall_delivery() {
    let pipeline = Arc::new(
        RelevancePipeline::new(
            &Default::default(),
            Arc::new(scenario_embedder()),
            Arc::new(scenario_extractor()),
            RESUME,
        )
        .expect("pipeline"),
    );
    let shared = SharedSink::default();
    let source = GatedSource { sink: shared.clone(), pulls: 0 };
    let mut sink = shared.clone();
    let summary = score_concurrently(pipeline, source, &mut sink, 2).await.expect("run");
    assert_eq!(summary.source_errors, 0);
    assert_eq!(*shared.0.lock().expect("lock"), vec!["https://jobs/1".to_string()]);
}

#[test]
fn resume_profile_uses_canonical_labels() {
    let pipeline = fake_pipeline();
    let keywords = pipeline.resume().keywords();
    assert!(!keywords.is_empty());
    // Structured extraction only ever yields taxonomy labels.
    for kw in keywords {
        assert!(jobfit_core::config::DEFAULT_SKILLS.contains(&kw.as_str()), "{kw} is not a canonical label");
    }
    assert!(keywords.contains("react"));
}
