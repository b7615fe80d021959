//! Small point sample for plotting.
//!
//! Generated from its own generator stream; it never touches the sources a
//! run's workers draw from, so rendering a preview cannot change an estimate.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::sampler::is_inside;

/// Worker streams are numbered from zero; the preview reads from the far end.
const PREVIEW_STREAM: u64 = u64::MAX;

/// Default size of a preview, enough to see the arc.
pub const DEFAULT_PREVIEW_POINTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewPoint {
    pub x: f64,
    pub y: f64,
    pub inside: bool,
}

pub fn preview_points(count: usize, seed: u64) -> Vec<PreviewPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(PREVIEW_STREAM);

    (0..count)
        .map(|_| {
            let x: f64 = rng.gen();
            let y: f64 = rng.gen();
            PreviewPoint {
                x,
                y,
                inside: is_inside(x, y),
            }
        })
        .collect()
}
