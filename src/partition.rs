use crate::error::{EstimateError, Result};

/// One worker's share of the run. Built once by the partitioner and moved into
/// the worker that consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleAssignment {
    pub worker_id: usize,
    pub sample_count: u64,
}

/// Upper bound on workers per run. Each worker is an OS thread.
pub const MAX_WORKERS: usize = 1 << 16;

pub(crate) fn check(total_samples: u64, worker_count: usize) -> Result<()> {
    if worker_count < 1 {
        return Err(EstimateError::InvalidConfiguration(format!(
            "worker_count must be at least 1, got {}",
            worker_count
        )));
    }
    if worker_count > MAX_WORKERS {
        return Err(EstimateError::InvalidConfiguration(format!(
            "worker_count must be at most {}, got {}",
            MAX_WORKERS, worker_count
        )));
    }
    if total_samples < 1 {
        return Err(EstimateError::InvalidConfiguration(
            "total_samples must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Splits `total_samples` into `worker_count` shares that differ by at most
/// one. The first `total_samples % worker_count` shares carry the remainder,
/// so the shares always sum to the requested total.
pub fn partition(total_samples: u64, worker_count: usize) -> Result<Vec<u64>> {
    check(total_samples, worker_count)?;

    let workers = worker_count as u64;
    let base = total_samples / workers;
    let remainder = total_samples % workers;

    Ok((0..workers)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect())
}

/// Pairs every share from [`partition`] with its worker id.
pub fn assignments(total_samples: u64, worker_count: usize) -> Result<Vec<SampleAssignment>> {
    Ok(partition(total_samples, worker_count)?
        .into_iter()
        .enumerate()
        .map(|(worker_id, sample_count)| SampleAssignment {
            worker_id,
            sample_count,
        })
        .collect())
}
