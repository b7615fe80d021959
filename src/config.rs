use crate::error::Result;
use crate::partition;
use crate::source::{SeededSources, SourceKind};

/// How workers hand their result back to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectMode {
    /// One message per worker over an mpsc channel.
    #[default]
    Channel,
    /// Workers insert into a mutex-guarded map once their loop is done.
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorConfig {
    pub total_samples: u64,
    pub worker_count: usize,
    pub seed: u64,
    pub source: SourceKind,
    pub collect: CollectMode,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            total_samples: 10_000_000,
            worker_count: 4,
            seed: 0,
            source: SourceKind::ChaCha,
            collect: CollectMode::Channel,
        }
    }
}

impl EstimatorConfig {
    pub fn new(total_samples: u64, worker_count: usize) -> Self {
        Self {
            total_samples,
            worker_count,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    pub fn with_collect(mut self, collect: CollectMode) -> Self {
        self.collect = collect;
        self
    }

    pub fn validate(&self) -> Result<()> {
        partition::check(self.total_samples, self.worker_count)
    }

    /// Per-worker sources derived from this run's seed.
    pub fn sources(&self) -> SeededSources {
        SeededSources::new(self.seed, self.source)
    }
}
