use tracing::debug;

use crate::error::{EstimateError, Result, SourceFault};
use crate::partition::SampleAssignment;
use crate::source::UnitSource;

/// A worker's published inside-count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialResult {
    pub worker_id: usize,
    pub inside_count: u64,
}

/// Closed quarter disk: points on the arc count as inside.
#[inline]
pub fn is_inside(x: f64, y: f64) -> bool {
    x * x + y * y <= 1.0
}

/// Draws `n` points from `source` and returns how many land inside the
/// quarter disk. The counter is local; nothing is reported until the loop
/// has run to completion.
pub fn sample<S: UnitSource + ?Sized>(source: &mut S, n: u64) -> std::result::Result<u64, SourceFault> {
    let mut inside = 0;

    for _ in 0..n {
        let x = source.next_unit()?;
        let y = source.next_unit()?;
        if is_inside(x, y) {
            inside += 1;
        }
    }

    Ok(inside)
}

/// Runs one worker's full sampling loop for its assignment.
pub fn run_assignment<S: UnitSource + ?Sized>(
    assignment: SampleAssignment,
    source: &mut S,
) -> Result<PartialResult> {
    let inside_count = sample(source, assignment.sample_count)
        .map_err(|fault| EstimateError::worker(assignment.worker_id, fault.to_string()))?;

    debug!(
        worker_id = assignment.worker_id,
        samples = assignment.sample_count,
        inside = inside_count,
        "worker finished sampling"
    );

    Ok(PartialResult {
        worker_id: assignment.worker_id,
        inside_count,
    })
}
