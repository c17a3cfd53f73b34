use palette::Srgb;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use crate::color::distance_squared;
use crate::error::{ExtractError, try_filled};
use crate::sampler::PixelSample;

/// Iteration cap for the Lloyd loop.
pub const MAX_ITERATIONS: usize = 12;

/// A centroid and the total sample weight assigned to it in the last pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    pub color: Srgb<f32>,
    pub weight: f64,
}

impl Cluster {
    pub fn new(color: Srgb<f32>) -> Self {
        Self { color, weight: 0.0 }
    }
}

/// Nearest centroid by squared RGB distance. Ties go to the lowest index.
#[inline]
fn nearest(color: Srgb<f32>, clusters: &[Cluster]) -> (usize, f32) {
    let mut best = f32::INFINITY;
    let mut best_idx = 0;
    for (k, c) in clusters.iter().enumerate() {
        let d = distance_squared(color, c.color);
        if d < best {
            best = d;
            best_idx = k;
        }
    }
    (best_idx, best)
}

/// Nearest-centroid search for every sample against a frozen set of centroids.
fn assign_all(samples: &[PixelSample], clusters: &[Cluster], out: &mut [(usize, f32)]) {
    #[cfg(feature = "parallel")]
    {
        out.par_iter_mut()
            .zip(samples.par_iter())
            .for_each(|(slot, s)| *slot = nearest(s.color, clusters));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (slot, s) in out.iter_mut().zip(samples) {
            *slot = nearest(s.color, clusters);
        }
    }
}

/// Weighted RGB sums for one cluster, kept in f64 while accumulating.
#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    r: f64,
    g: f64,
    b: f64,
}

impl Accumulator {
    #[inline]
    fn add(&mut self, c: Srgb<f32>, w: f64) {
        self.r += c.red as f64 * w;
        self.g += c.green as f64 * w;
        self.b += c.blue as f64 * w;
    }

    #[inline]
    fn sub(&mut self, c: Srgb<f32>, w: f64) {
        self.r -= c.red as f64 * w;
        self.g -= c.green as f64 * w;
        self.b -= c.blue as f64 * w;
    }

    fn mean(&self, weight: f64) -> Srgb<f32> {
        Srgb::new(
            (self.r / weight).clamp(0.0, 1.0) as f32,
            (self.g / weight).clamp(0.0, 1.0) as f32,
            (self.b / weight).clamp(0.0, 1.0) as f32,
        )
    }
}

/// Weighted Lloyd's algorithm with empty-cluster recovery.
///
/// Each iteration assigns every sample to its nearest centroid, reseeds any cluster left
/// without weight on the sample farthest from its own centroid, then moves each centroid to
/// the weighted mean of its members. Stops once a pass changes nothing or after
/// `max_iterations`. On return every cluster's `weight` holds the weight of its final
/// members. Returns the number of iterations run.
pub fn run(
    samples: &[PixelSample],
    clusters: &mut [Cluster],
    max_iterations: usize,
) -> Result<usize, ExtractError> {
    let n = samples.len();
    let k = clusters.len();
    if n == 0 || k == 0 {
        return Ok(0);
    }

    let mut assignment: Vec<Option<usize>> = try_filled(n, None)?;
    let mut best: Vec<(usize, f32)> = try_filled(n, (0, 0.0))?;
    let mut sums: Vec<Accumulator> = try_filled(k, Accumulator::default())?;

    let mut iterations = 0;
    while iterations < max_iterations {
        iterations += 1;
        let mut changed = false;

        for (c, acc) in clusters.iter_mut().zip(sums.iter_mut()) {
            c.weight = 0.0;
            *acc = Accumulator::default();
        }

        // Assign: read-only over the centroids, then a serial accumulation pass.
        assign_all(samples, clusters, &mut best);
        for (i, (s, &(bi, _))) in samples.iter().zip(&best).enumerate() {
            if assignment[i] != Some(bi) {
                assignment[i] = Some(bi);
                changed = true;
            }
            let w = s.weight as f64;
            sums[bi].add(s.color, w);
            clusters[bi].weight += w;
        }

        // Empty clusters steal the sample that currently fits its centroid worst.
        for empty in 0..k {
            if clusters[empty].weight > 0.0 {
                continue;
            }
            let Some(far) = farthest(&best) else {
                continue;
            };
            let s = samples[far];
            let w = s.weight as f64;
            if let Some(old) = assignment[far] {
                sums[old].sub(s.color, w);
                clusters[old].weight = (clusters[old].weight - w).max(0.0);
            }
            assignment[far] = Some(empty);
            sums[empty].add(s.color, w);
            clusters[empty].weight += w;
            // The stolen sample now sits on its new centroid.
            best[far] = (empty, 0.0);
            changed = true;
            trace!(cluster = empty, sample = far, "reseeded empty cluster");
        }

        // Update: clusters that stayed empty keep their centroid.
        for (c, acc) in clusters.iter_mut().zip(&sums) {
            if c.weight > 0.0 {
                c.color = acc.mean(c.weight);
            }
        }

        if !changed {
            break;
        }
    }

    Ok(iterations)
}

/// Index of the sample with the largest recorded distance; first one wins on ties.
fn farthest(best: &[(usize, f32)]) -> Option<usize> {
    let mut far = None;
    let mut far_d = -1.0f32;
    for (i, &(_, d)) in best.iter().enumerate() {
        if d > far_d {
            far_d = d;
            far = Some(i);
        }
    }
    far
}
