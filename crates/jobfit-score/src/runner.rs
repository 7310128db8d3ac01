//! Concurrent scoring on blocking worker tasks.
//!
//! A blocking producer task drains the source into a bounded channel, so file
//! reads never run on the executor. Postings are evaluated on up to `workers`
//! blocking tasks at a time and delivered in the order they were pulled, so
//! the sink sees exactly what a sequential run would write.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;

use jobfit_core::traits::{JobSource, ResultSink};
use jobfit_core::types::JobPosting;
use jobfit_core::{Error, Result};

use crate::pipeline::{deliver, Outcome, RelevancePipeline, RunSummary};

type Pulled = anyhow::Result<JobPosting>;

/// Stops early once the receiving side is gone.
fn pull_all<S: JobSource>(mut source: S, tx: mpsc::Sender<Pulled>) {
    loop {
        let item = match source.next_posting() {
            Ok(Some(posting)) => Ok(posting),
            Ok(None) => break,
            Err(err) => Err(err),
        };
        if tx.blocking_send(item).is_err() {
            tracing::debug!("scoring stopped, no longer pulling postings");
            break;
        }
    }
}

pub async fn score_concurrently<S>(
    pipeline: Arc<RelevancePipeline>,
    source: S,
    sink: &mut dyn ResultSink,
    workers: usize,
) -> Result<RunSummary>
where
    S: JobSource + Send + 'static,
{
    let workers = workers.max(1);
    let (tx, rx) = mpsc::channel::<Pulled>(workers);
    let producer = tokio::task::spawn_blocking(move || pull_all(source, tx));
    let pulled = stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|item| (item, rx)) });

    let mut outcomes = std::pin::pin!(pulled
        .map(|item| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                let posting = match item {
                    Ok(posting) => posting,
                    Err(err) => {
                        tracing::warn!(error = %format!("{err:#}"), "job source entry unreadable");
                        return None;
                    }
                };
                let identifier = posting.identifier.clone();
                let outcome = tokio::task::spawn_blocking(move || pipeline.evaluate_or_skip(&posting))
                    .await
                    .unwrap_or_else(|join_err| {
                        tracing::error!(id = %identifier, error = %join_err, "scoring task failed");
                        Outcome::Skipped { identifier, reason: format!("scoring task failed: {join_err}") }
                    });
                Some(outcome)
            }
        })
        .buffered(workers));

    let mut summary = RunSummary::default();
    while let Some(slot) = outcomes.next().await {
        match slot {
            Some(outcome) => deliver(&outcome, sink, &mut summary)?,
            None => summary.source_errors += 1,
        }
    }
    if let Err(join_err) = producer.await {
        // The source panicked; whatever it yielded before that was scored.
        tracing::error!(error = %join_err, "job source task failed");
        summary.source_errors += 1;
    }
    sink.flush().map_err(|e| Error::Sink(format!("{e:#}")))?;
    tracing::info!(?summary, workers, "concurrent run finished");
    Ok(summary)
}
