//! End-to-end runs through the public API.

use montecarlo_pi::{
    assignments, estimate_pi, estimate_pi_async, estimate_pi_async_with_sources, estimate_pi_with,
    estimate_pi_with_sources, sample, CollectMode, EstimateError, EstimatorConfig, SeededSources,
    SourceFactory, SourceFault, SourceKind, UnitSource, MAX_WORKERS,
};

const TOLERANCE: f64 = 0.01;

/// Fails after a fixed number of draws.
struct FailsAfter {
    remaining: usize,
}

impl UnitSource for FailsAfter {
    fn next_unit(&mut self) -> Result<f64, SourceFault> {
        if self.remaining == 0 {
            return Err(SourceFault("entropy pool exhausted".to_string()));
        }
        self.remaining -= 1;
        Ok(0.5)
    }
}

struct Panics;

impl UnitSource for Panics {
    fn next_unit(&mut self) -> Result<f64, SourceFault> {
        panic!("sampler crashed");
    }
}

fn faulty_worker(bad: usize) -> impl Fn(usize) -> Box<dyn UnitSource + Send> {
    move |id| -> Box<dyn UnitSource + Send> {
        if id == bad {
            Box::new(FailsAfter { remaining: 10 })
        } else {
            SeededSources::new(5, SourceKind::ChaCha).source_for(id)
        }
    }
}

#[test]
fn four_million_samples_on_four_workers() {
    let config = EstimatorConfig::new(4_000_000, 4).with_seed(2024);

    let first = estimate_pi_with(&config).unwrap();
    let second = estimate_pi_with(&config).unwrap();

    assert_eq!(first, second, "seeded runs must be reproducible");
    assert_eq!(first.total_samples, 4_000_000);
    assert!(
        (first.pi_estimate - std::f64::consts::PI).abs() < TOLERANCE,
        "estimate {} too far from pi",
        first.pi_estimate
    );
}

#[test]
fn collect_modes_agree() {
    let config = EstimatorConfig::new(200_003, 6).with_seed(17);
    let by_channel = estimate_pi_with(&config).unwrap();
    let by_lock = estimate_pi_with(&config.clone().with_collect(CollectMode::Locked)).unwrap();
    assert_eq!(by_channel, by_lock);
}

#[tokio::test]
async fn async_dispatch_agrees_with_threads() {
    let config = EstimatorConfig::new(300_000, 4)
        .with_seed(3)
        .with_source(SourceKind::Lcg);
    let threaded = estimate_pi_with(&config).unwrap();
    let async_run = estimate_pi_async(&config).await.unwrap();
    assert_eq!(threaded, async_run);
}

#[test]
fn single_worker_matches_direct_sampling() {
    let n = 100_000;
    let config = EstimatorConfig::new(n, 1).with_seed(8);

    let inside = sample(&mut config.sources().source_for(0), n).unwrap();
    let estimate = estimate_pi_with(&config).unwrap();

    assert_eq!(estimate.total_inside, inside);
    assert_eq!(estimate.pi_estimate, 4.0 * inside as f64 / n as f64);
}

#[test]
fn multi_worker_total_is_sum_of_shares() {
    let config = EstimatorConfig::new(90_007, 7).with_seed(21);
    let sources = config.sources();

    let expected: u64 = assignments(config.total_samples, config.worker_count)
        .unwrap()
        .into_iter()
        .map(|a| sample(&mut sources.source_for(a.worker_id), a.sample_count).unwrap())
        .sum();

    let estimate = estimate_pi_with(&config).unwrap();
    assert_eq!(estimate.total_inside, expected);
    assert_eq!(estimate.pi_estimate, 4.0 * expected as f64 / 90_007.0);
}

#[test]
fn more_workers_than_samples() {
    let estimate = estimate_pi(3, 8).unwrap();
    assert_eq!(estimate.total_samples, 3);
    assert!(estimate.total_inside <= 3);
}

#[test]
fn zero_samples_is_rejected() {
    assert!(matches!(
        estimate_pi(0, 4),
        Err(EstimateError::InvalidConfiguration(_))
    ));
}

#[test]
fn zero_workers_is_rejected() {
    assert!(matches!(
        estimate_pi(1_000, 0),
        Err(EstimateError::InvalidConfiguration(_))
    ));
}

#[test]
fn source_fault_fails_the_run() {
    for mode in [CollectMode::Channel, CollectMode::Locked] {
        let config = EstimatorConfig::new(10_000, 4).with_collect(mode);
        let outcome = estimate_pi_with_sources(&config, &faulty_worker(2));
        assert!(
            matches!(outcome, Err(EstimateError::WorkerFailure { worker_id: 2, .. })),
            "{:?}: got {:?}",
            mode,
            outcome
        );
    }
}

fn panicking_worker(bad: usize) -> impl Fn(usize) -> Box<dyn UnitSource + Send> {
    move |id| -> Box<dyn UnitSource + Send> {
        if id == bad {
            Box::new(Panics)
        } else {
            SeededSources::new(0, SourceKind::Lcg).source_for(id)
        }
    }
}

fn assert_panicked_worker(outcome: montecarlo_pi::Result<montecarlo_pi::AggregateEstimate>, expected: usize) {
    match outcome {
        Err(EstimateError::WorkerFailure { worker_id, reason }) => {
            assert_eq!(worker_id, expected);
            assert!(reason.contains("sampler crashed"), "reason: {}", reason);
        }
        other => panic!("expected worker failure, got {:?}", other),
    }
}

#[test]
fn panicking_worker_fails_the_run() {
    for mode in [CollectMode::Channel, CollectMode::Locked] {
        let config = EstimatorConfig::new(10_000, 3).with_collect(mode);
        assert_panicked_worker(estimate_pi_with_sources(&config, &panicking_worker(0)), 0);
    }
}

#[tokio::test]
async fn async_panicking_worker_fails_the_run() {
    let config = EstimatorConfig::new(10_000, 3);
    let outcome = estimate_pi_async_with_sources(&config, &panicking_worker(1)).await;
    assert_panicked_worker(outcome, 1);
}

#[test]
fn worker_count_above_limit_is_rejected() {
    assert!(matches!(
        estimate_pi(1_000, MAX_WORKERS + 1),
        Err(EstimateError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        estimate_pi(1, usize::MAX),
        Err(EstimateError::InvalidConfiguration(_))
    ));
}

#[tokio::test]
async fn async_source_fault_fails_the_run() {
    let config = EstimatorConfig::new(10_000, 4);
    let outcome = estimate_pi_async_with_sources(&config, &faulty_worker(3)).await;
    assert!(matches!(
        outcome,
        Err(EstimateError::WorkerFailure { worker_id: 3, .. })
    ));
}

#[test]
fn worker_without_work_never_touches_its_source() {
    // 2 samples over 3 workers: worker 2 gets nothing and must not fail
    let config = EstimatorConfig::new(2, 3);
    let sources = |id: usize| -> Box<dyn UnitSource + Send> {
        if id == 2 {
            Box::new(FailsAfter { remaining: 0 })
        } else {
            SeededSources::new(1, SourceKind::ChaCha).source_for(id)
        }
    };
    let estimate = estimate_pi_with_sources(&config, &sources).unwrap();
    assert_eq!(estimate.total_samples, 2);
}
