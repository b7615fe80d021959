//! Monte Carlo estimation of π over a pool of independent workers.
//!
//! A run partitions the requested number of samples across `worker_count`
//! workers, lets every worker count how many of its uniform points in the unit
//! square fall inside the quarter disk `x² + y² ≤ 1`, and then reduces those
//! counts to `4 * inside / total`.
//!
//! ```no_run
//! let estimate = montecarlo_pi::estimate_pi(4_000_000, 4)?;
//! println!("π ≈ {}", estimate.pi_estimate);
//! # Ok::<(), montecarlo_pi::EstimateError>(())
//! ```

pub mod collection;
pub mod config;
pub mod dispatch;
pub mod dispatch_async;
pub mod error;
pub mod estimator;
pub mod partition;
pub mod preview;
pub mod reducer;
pub mod sampler;
pub mod source;

pub use collection::ResultCollection;
pub use config::{CollectMode, EstimatorConfig};
pub use dispatch_async::{estimate_pi_async, estimate_pi_async_with_sources};
pub use error::{EstimateError, Result, SourceFault};
pub use estimator::{estimate_pi, estimate_pi_with, estimate_pi_with_sources, RunState};
pub use partition::{assignments, partition, SampleAssignment, MAX_WORKERS};
pub use preview::{preview_points, PreviewPoint};
pub use reducer::{reduce, AggregateEstimate};
pub use sampler::{sample, PartialResult};
pub use source::{LcgSource, RngSource, SeededSources, SourceFactory, SourceKind, UnitSource};
