//! Uniform random sources owned by individual workers.
//!
//! Every worker gets its own generator, built by a [`SourceFactory`] on the
//! dispatching thread before the worker starts. Nothing here is shared between
//! workers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SourceFault;

/// A stream of draws, uniform on `[0, 1)`.
pub trait UnitSource {
    fn next_unit(&mut self) -> Result<f64, SourceFault>;
}

impl<S: UnitSource + ?Sized> UnitSource for Box<S> {
    fn next_unit(&mut self) -> Result<f64, SourceFault> {
        (**self).next_unit()
    }
}

/// Adapts any `rand` generator. Draws never fault.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> UnitSource for RngSource<R> {
    fn next_unit(&mut self) -> Result<f64, SourceFault> {
        Ok(self.rng.gen::<f64>())
    }
}

/// Linear congruential generator. State update and per-worker seeding are the
/// same as the other language ports of the benchmark. The output is scaled by
/// `2^31` rather than `0x7FFFFFFF`, so draws stay in `[0, 1)` and single draws
/// differ slightly from the ports.
#[derive(Debug, Clone)]
pub struct LcgSource {
    state: u32,
}

impl LcgSource {
    const SCALE: f64 = (1u64 << 31) as f64;

    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seed pattern used by the benchmark ports: `12345 + worker_id * 67890`.
    pub fn for_worker(run_seed: u64, worker_id: usize) -> Self {
        let seed = 12345u64
            .wrapping_add((worker_id as u64).wrapping_mul(67890))
            .wrapping_add(run_seed);
        Self::new(seed as u32)
    }
}

impl UnitSource for LcgSource {
    fn next_unit(&mut self) -> Result<f64, SourceFault> {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        Ok((self.state & 0x7FFF_FFFF) as f64 / Self::SCALE)
    }
}

/// Which generator family seeded sources are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    #[default]
    ChaCha,
    Lcg,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chacha" => Ok(SourceKind::ChaCha),
            "lcg" => Ok(SourceKind::Lcg),
            other => Err(format!("unknown source kind '{}'", other)),
        }
    }
}

/// Builds the random source for one worker.
pub trait SourceFactory {
    fn source_for(&self, worker_id: usize) -> Box<dyn UnitSource + Send>;
}

impl<F> SourceFactory for F
where
    F: Fn(usize) -> Box<dyn UnitSource + Send>,
{
    fn source_for(&self, worker_id: usize) -> Box<dyn UnitSource + Send> {
        self(worker_id)
    }
}

/// Deterministic per-worker sources derived from one run seed.
#[derive(Debug, Clone, Copy)]
pub struct SeededSources {
    pub seed: u64,
    pub kind: SourceKind,
}

impl SeededSources {
    pub fn new(seed: u64, kind: SourceKind) -> Self {
        Self { seed, kind }
    }
}

impl SourceFactory for SeededSources {
    fn source_for(&self, worker_id: usize) -> Box<dyn UnitSource + Send> {
        match self.kind {
            SourceKind::ChaCha => {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
                // disjoint stream per worker
                rng.set_stream(worker_id as u64);
                Box::new(RngSource::new(rng))
            }
            SourceKind::Lcg => Box::new(LcgSource::for_worker(self.seed, worker_id)),
        }
    }
}
