use std::time::Instant;

use tracing::{debug, info};

use crate::config::EstimatorConfig;
use crate::dispatch::dispatch;
use crate::error::Result;
use crate::partition::assignments;
use crate::reducer::{reduce, AggregateEstimate};
use crate::source::SourceFactory;

/// Lifecycle of a single estimation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Configured,
    Partitioned,
    Dispatched,
    AllWorkersDone,
    Reduced,
}

impl RunState {
    pub fn next(self) -> Option<RunState> {
        match self {
            RunState::Configured => Some(RunState::Partitioned),
            RunState::Partitioned => Some(RunState::Dispatched),
            RunState::Dispatched => Some(RunState::AllWorkersDone),
            RunState::AllWorkersDone => Some(RunState::Reduced),
            RunState::Reduced => None,
        }
    }
}

/// Tracks the run through its states, logging each step.
#[derive(Debug)]
pub(crate) struct RunProgress {
    state: RunState,
}

impl RunProgress {
    pub(crate) fn start(config: &EstimatorConfig) -> Result<Self> {
        config.validate()?;
        info!(
            total_samples = config.total_samples,
            workers = config.worker_count,
            seed = config.seed,
            "starting estimation run"
        );
        Ok(Self {
            state: RunState::Configured,
        })
    }

    pub(crate) fn advance(&mut self) {
        if let Some(next) = self.state.next() {
            debug!(from = ?self.state, to = ?next, "run state");
            self.state = next;
        }
    }

    pub(crate) fn state(&self) -> RunState {
        self.state
    }
}

/// Estimates π from `total_samples` points split over `worker_count` threads,
/// using the default seeded sources.
pub fn estimate_pi(total_samples: u64, worker_count: usize) -> Result<AggregateEstimate> {
    estimate_pi_with(&EstimatorConfig::new(total_samples, worker_count))
}

pub fn estimate_pi_with(config: &EstimatorConfig) -> Result<AggregateEstimate> {
    estimate_pi_with_sources(config, &config.sources())
}

/// Runs the estimator with caller-supplied per-worker random sources.
/// `config.seed` and `config.source` are ignored.
pub fn estimate_pi_with_sources<F: SourceFactory + ?Sized>(
    config: &EstimatorConfig,
    sources: &F,
) -> Result<AggregateEstimate> {
    let started = Instant::now();
    let mut progress = RunProgress::start(config)?;

    let plan = assignments(config.total_samples, config.worker_count)?;
    progress.advance();

    let running = dispatch(&plan, sources, config.collect)?;
    debug!(workers = running.worker_count(), "workers dispatched");
    progress.advance();

    let results = running.wait_all()?;
    progress.advance();

    let estimate = reduce(&results, &plan)?;
    progress.advance();
    debug_assert_eq!(progress.state(), RunState::Reduced);

    info!(
        pi = estimate.pi_estimate,
        inside = estimate.total_inside,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "estimation finished"
    );
    Ok(estimate)
}
