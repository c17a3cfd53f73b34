use palette::Srgb;
use rand::Rng;

use crate::color::distance_squared_f64;
use crate::error::{ExtractError, try_filled};
use crate::sampler::PixelSample;

/// Weighted KMeans++ seeding.
///
/// The first center is drawn uniformly. Every following center is drawn with probability
/// proportional to `weight * d²`, where `d` is the distance to the nearest center chosen so
/// far. When that mass is zero, the draw falls back to a uniform pick.
pub fn kmeans_plus_plus<R: Rng + ?Sized>(
    samples: &[PixelSample],
    k: usize,
    rng: &mut R,
) -> Result<Vec<Srgb<f32>>, ExtractError> {
    let n = samples.len();
    if n == 0 || k == 0 {
        return Ok(Vec::new());
    }

    let mut centers = Vec::new();
    centers
        .try_reserve_exact(k)
        .map_err(|_| ExtractError::Allocation(k))?;

    let first = samples[rng.random_range(0..n)].color;
    centers.push(first);

    let mut nearest = try_filled(n, 0.0f64)?;
    for (d, s) in nearest.iter_mut().zip(samples) {
        *d = distance_squared_f64(s.color, first);
    }

    while centers.len() < k {
        let mass: f64 = samples
            .iter()
            .zip(&nearest)
            .map(|(s, &d)| s.weight as f64 * d)
            .sum();

        let idx = if mass > 0.0 {
            pick_proportional(samples, &nearest, rng.random::<f64>() * mass)
        } else {
            rng.random_range(0..n)
        };

        let center = samples[idx].color;
        centers.push(center);

        for (d, s) in nearest.iter_mut().zip(samples) {
            let candidate = distance_squared_f64(s.color, center);
            if candidate < *d {
                *d = candidate;
            }
        }
    }

    Ok(centers)
}

/// Index of the first sample whose cumulative `weight * d²` reaches `target`.
fn pick_proportional(samples: &[PixelSample], nearest: &[f64], target: f64) -> usize {
    let mut acc = 0.0;
    let mut last_positive = 0;
    for (i, (s, &d)) in samples.iter().zip(nearest).enumerate() {
        let m = s.weight as f64 * d;
        if m <= 0.0 {
            continue;
        }
        acc += m;
        last_positive = i;
        if acc >= target {
            return i;
        }
    }
    // Rounding can leave `acc` a hair short of `target`.
    last_positive
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample(r: f32, g: f32, b: f32, weight: u32) -> PixelSample {
        PixelSample {
            color: Srgb::new(r, g, b),
            weight,
        }
    }

    #[test]
    fn picks_every_distinct_sample_when_k_equals_n() {
        let samples = vec![
            sample(0.0, 0.0, 0.0, 5),
            sample(1.0, 0.0, 0.0, 1),
            sample(0.0, 1.0, 0.0, 3),
            sample(0.0, 0.0, 1.0, 9),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let centers = kmeans_plus_plus(&samples, samples.len(), &mut rng).unwrap();
        assert_eq!(centers.len(), 4);
        for s in &samples {
            assert!(centers.contains(&s.color), "missing {:?}", s.color);
        }
    }

    #[test]
    fn same_seed_same_centers() {
        let samples: Vec<_> = (0..32)
            .map(|i| sample(i as f32 / 31.0, 0.5, 1.0 - i as f32 / 31.0, i + 1))
            .collect();
        let a = kmeans_plus_plus(&samples, 6, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = kmeans_plus_plus(&samples, 6, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_mass_falls_back_to_uniform() {
        let samples = vec![sample(0.3, 0.3, 0.3, 2), sample(0.3, 0.3, 0.3, 7)];
        let centers = kmeans_plus_plus(&samples, 2, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(centers.len(), 2);
        assert!(centers.iter().all(|c| *c == Srgb::new(0.3, 0.3, 0.3)));
    }

    #[test]
    fn heavy_far_sample_is_favoured() {
        // Second center: weight*d² is 1e6*3 for white vs ~0 for the near-black cluster.
        let mut samples = vec![sample(1.0, 1.0, 1.0, 1_000_000)];
        samples.extend((0..8).map(|i| sample(0.0, 0.0, i as f32 / 1000.0, 1)));
        for seed in 0..16 {
            let centers = kmeans_plus_plus(&samples, 2, &mut StdRng::seed_from_u64(seed)).unwrap();
            let white = Srgb::new(1.0, 1.0, 1.0);
            if centers[0] != white {
                assert_eq!(centers[1], white, "seed {seed}");
            }
        }
    }

    #[test]
    fn empty_input_yields_no_centers() {
        let centers = kmeans_plus_plus(&[], 3, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(centers.is_empty());
    }
}
