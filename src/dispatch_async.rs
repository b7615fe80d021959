//! Same run, with workers on tokio's blocking pool.
//!
//! The sampling loop is CPU bound, so each worker goes through
//! `spawn_blocking` rather than onto the async executor. A task's join handle
//! carries its single result back to the dispatcher.

use std::time::Instant;

use tokio::task;
use tracing::{info, warn};

use crate::collection::ResultCollection;
use crate::config::EstimatorConfig;
use crate::dispatch::panic_message;
use crate::error::{EstimateError, Result};
use crate::estimator::RunProgress;
use crate::partition::assignments;
use crate::reducer::{reduce, AggregateEstimate};
use crate::sampler::run_assignment;
use crate::source::SourceFactory;

pub async fn estimate_pi_async(config: &EstimatorConfig) -> Result<AggregateEstimate> {
    estimate_pi_async_with_sources(config, &config.sources()).await
}

pub async fn estimate_pi_async_with_sources<F: SourceFactory + ?Sized>(
    config: &EstimatorConfig,
    sources: &F,
) -> Result<AggregateEstimate> {
    let started = Instant::now();
    let mut progress = RunProgress::start(config)?;

    let plan = assignments(config.total_samples, config.worker_count)?;
    progress.advance();

    let handles: Vec<_> = plan
        .iter()
        .map(|&assignment| {
            let mut source = sources.source_for(assignment.worker_id);
            let handle = task::spawn_blocking(move || run_assignment(assignment, &mut source));
            (assignment.worker_id, handle)
        })
        .collect();
    progress.advance();

    // await every handle before publishing, so no task outlives the run
    let mut finished = Vec::with_capacity(handles.len());
    let mut failure = None;
    for (worker_id, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(join_err) if join_err.is_panic() => Err(EstimateError::worker(
                worker_id,
                panic_message(&*join_err.into_panic()),
            )),
            Err(join_err) => Err(EstimateError::worker(worker_id, join_err.to_string())),
        };
        match outcome {
            Ok(result) => finished.push(result),
            Err(err) => {
                warn!(worker_id, error = %err, "worker failed");
                if failure.is_none() {
                    failure = Some(err);
                }
            }
        }
    }
    if let Some(err) = failure {
        return Err(err);
    }

    let mut results = ResultCollection::new();
    for result in finished {
        results.publish(result)?;
    }
    progress.advance();

    let estimate = reduce(&results, &plan)?;
    progress.advance();

    info!(
        pi = estimate.pi_estimate,
        inside = estimate.total_inside,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "async estimation finished"
    );
    Ok(estimate)
}
