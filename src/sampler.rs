//! Histogram sampling: a regular subsampling grid, an alpha filter, and a 5-bit-per-channel
//! histogram that turns the visited pixels into weighted representative colors.

use std::sync::LazyLock;

use palette::Srgb;

use crate::error::{ExtractError, try_filled};

/// Bits kept per channel.
pub const QUANT_BITS: u32 = 5;
/// Levels per channel (32).
pub const QUANT_LEVELS: usize = 1 << QUANT_BITS;
/// Histogram size (32³).
pub const HISTOGRAM_SIZE: usize = QUANT_LEVELS * QUANT_LEVELS * QUANT_LEVELS;

/// Level → [0, 1] with the top level mapping to exactly 1.0.
static LEVEL_TO_UNIT: LazyLock<[f32; QUANT_LEVELS]> = LazyLock::new(|| {
    let mut lut = [0.0f32; QUANT_LEVELS];
    for (q, v) in lut.iter_mut().enumerate() {
        *v = q as f32 / (QUANT_LEVELS - 1) as f32;
    }
    lut
});

/// A representative color and the number of sampled pixels that quantized into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    pub color: Srgb<f32>,
    pub weight: u32,
}

/// floor(v * 32 / 256)
#[inline(always)]
fn quantize_channel(v: u8) -> usize {
    (v as usize * QUANT_LEVELS) >> 8
}

#[inline(always)]
fn bucket_key(r: u8, g: u8, b: u8) -> usize {
    (quantize_channel(r) << (QUANT_BITS * 2)) | (quantize_channel(g) << QUANT_BITS) | quantize_channel(b)
}

#[inline]
fn bucket_color(key: usize) -> Srgb<f32> {
    let mask = QUANT_LEVELS - 1;
    let lut = &*LEVEL_TO_UNIT;
    Srgb::new(
        lut[(key >> (QUANT_BITS * 2)) & mask],
        lut[(key >> QUANT_BITS) & mask],
        lut[key & mask],
    )
}

/// Grid step that brings `width * height` down to roughly `target` visited pixels.
///
/// A `target` of zero, or an image already within budget, is walked at step 1.
pub fn sampling_step(width: u32, height: u32, target: u32) -> usize {
    let total = width as u64 * height as u64;
    if target == 0 || total <= target as u64 {
        return 1;
    }
    let ratio = (total as f64 / target as f64).sqrt();
    (ratio.ceil() as usize).max(1)
}

/// Build weighted samples from an RGBA8, row-major buffer.
///
/// Visits `(x, y)` for `x, y` multiples of `step`, drops pixels whose alpha is not strictly
/// above `alpha_threshold`, and emits one sample per non-empty histogram bucket in bucket
/// order. An empty result means no pixel survived the alpha filter.
pub fn build_weighted_samples(
    rgba: &[u8],
    width: u32,
    height: u32,
    step: usize,
    alpha_threshold: u8,
) -> Result<Vec<PixelSample>, ExtractError> {
    let w = width as usize;
    let h = height as usize;
    let step = step.max(1);

    let mut counts = try_filled(HISTOGRAM_SIZE, 0u32)?;

    for y in (0..h).step_by(step) {
        let row = &rgba[y * w * 4..(y + 1) * w * 4];
        for px in row.chunks_exact(4).step_by(step) {
            if px[3] <= alpha_threshold {
                continue;
            }
            counts[bucket_key(px[0], px[1], px[2])] += 1;
        }
    }

    let occupied = counts.iter().filter(|&&c| c != 0).count();
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(occupied)
        .map_err(|_| ExtractError::Allocation(occupied))?;

    samples.extend(
        counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0)
            .map(|(key, &weight)| PixelSample {
                color: bucket_color(key),
                weight,
            }),
    );

    Ok(samples)
}
