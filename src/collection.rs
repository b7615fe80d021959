use std::collections::BTreeMap;

use crate::error::{EstimateError, Result};
use crate::sampler::PartialResult;

/// Partial results keyed by worker id. Each id may be published once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultCollection {
    results: BTreeMap<usize, PartialResult>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a worker's result. A second publish for the same worker is
    /// rejected and leaves the first one in place.
    pub fn publish(&mut self, result: PartialResult) -> Result<()> {
        if self.results.contains_key(&result.worker_id) {
            return Err(EstimateError::InconsistentResult {
                worker_id: result.worker_id,
                reason: "published more than once".to_string(),
            });
        }
        self.results.insert(result.worker_id, result);
        Ok(())
    }

    pub fn get(&self, worker_id: usize) -> Option<&PartialResult> {
        self.results.get(&worker_id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartialResult> {
        self.results.values()
    }
}
