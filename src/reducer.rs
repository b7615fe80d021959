use tracing::debug;

use crate::collection::ResultCollection;
use crate::error::{EstimateError, Result};
use crate::partition::SampleAssignment;

/// Final outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateEstimate {
    pub total_samples: u64,
    pub total_inside: u64,
    pub pi_estimate: f64,
}

impl AggregateEstimate {
    fn new(total_samples: u64, total_inside: u64) -> Self {
        Self {
            total_samples,
            total_inside,
            pi_estimate: 4.0 * total_inside as f64 / total_samples as f64,
        }
    }

    /// Signed distance from `std::f64::consts::PI`.
    pub fn error(&self) -> f64 {
        std::f64::consts::PI - self.pi_estimate
    }
}

/// Combines the partial results of every dispatched worker.
///
/// Must only be called once all workers have been joined. Every assignment
/// needs exactly one matching result; a missing one is never read as zero.
pub fn reduce(results: &ResultCollection, assignments: &[SampleAssignment]) -> Result<AggregateEstimate> {
    if results.len() < assignments.len() {
        return Err(EstimateError::IncompleteResults {
            expected: assignments.len(),
            received: results.len(),
        });
    }

    let mut total_samples = 0u64;
    let mut total_inside = 0u64;

    for assignment in assignments {
        let result = results
            .get(assignment.worker_id)
            .ok_or(EstimateError::IncompleteResults {
                expected: assignments.len(),
                received: results.len(),
            })?;

        if result.inside_count > assignment.sample_count {
            return Err(EstimateError::InconsistentResult {
                worker_id: assignment.worker_id,
                reason: format!(
                    "inside count {} exceeds {} assigned samples",
                    result.inside_count, assignment.sample_count
                ),
            });
        }

        total_samples += assignment.sample_count;
        total_inside += result.inside_count;
    }

    if let Some(stray) = results
        .iter()
        .find(|r| !assignments.iter().any(|a| a.worker_id == r.worker_id))
    {
        return Err(EstimateError::InconsistentResult {
            worker_id: stray.worker_id,
            reason: "no matching assignment".to_string(),
        });
    }

    if total_samples == 0 {
        return Err(EstimateError::InvalidConfiguration(
            "no samples were assigned".to_string(),
        ));
    }

    debug!(total_samples, total_inside, "reduced partial results");
    Ok(AggregateEstimate::new(total_samples, total_inside))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::assignments;
    use crate::sampler::PartialResult;

    fn result(worker_id: usize, inside_count: u64) -> PartialResult {
        PartialResult { worker_id, inside_count }
    }

    fn collect(results: Vec<PartialResult>) -> ResultCollection {
        let mut collection = ResultCollection::new();
        for r in results {
            collection.publish(r).unwrap();
        }
        collection
    }

    #[test]
    fn sums_all_workers() {
        let plan = assignments(10, 3).unwrap(); // 4, 3, 3
        let results = collect(vec![result(0, 3), result(1, 2), result(2, 3)]);
        let estimate = reduce(&results, &plan).unwrap();
        assert_eq!(estimate.total_samples, 10);
        assert_eq!(estimate.total_inside, 8);
        assert_eq!(estimate.pi_estimate, 3.2);
    }

    #[test]
    fn missing_worker_is_fatal() {
        let plan = assignments(10, 3).unwrap();
        let results = collect(vec![result(0, 3), result(2, 3)]);
        assert_eq!(
            reduce(&results, &plan),
            Err(EstimateError::IncompleteResults { expected: 3, received: 2 })
        );
    }

    #[test]
    fn unknown_worker_is_rejected() {
        let plan = assignments(10, 2).unwrap();
        let results = collect(vec![result(0, 1), result(1, 1), result(7, 1)]);
        assert!(matches!(
            reduce(&results, &plan),
            Err(EstimateError::InconsistentResult { worker_id: 7, .. })
        ));
    }

    #[test]
    fn overfull_count_is_rejected() {
        let plan = assignments(4, 2).unwrap();
        let results = collect(vec![result(0, 3), result(1, 1)]);
        assert!(matches!(
            reduce(&results, &plan),
            Err(EstimateError::InconsistentResult { worker_id: 0, .. })
        ));
    }

    #[test]
    fn error_is_distance_from_pi() {
        let estimate = AggregateEstimate::new(4, 3);
        assert_eq!(estimate.pi_estimate, 3.0);
        assert!((estimate.error() - (std::f64::consts::PI - 3.0)).abs() < 1e-12);
    }
}
