pub mod cluster;
pub mod color;
pub mod error;
pub mod init;
pub mod merge;
pub mod options;
pub mod sampler;
pub mod wasm;

pub use color::ExtractedColor;
pub use error::ExtractError;
pub use options::ExtractOptions;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use cluster::Cluster;
use merge::{ColorAggregate, MergeThresholds};

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use image::DynamicImage;

/// Extract the dominant colors of an RGBA8, row-major image.
///
/// Steps performed:
/// 1. Walk a regular grid sized from `options.pixels`, drop pixels at or below the alpha
///    threshold, and bucket the rest into a 5-bit-per-channel histogram.
/// 2. Seed `max_colors` clusters with weighted KMeans++.
/// 3. Refine them with weighted Lloyd iterations, reseeding clusters that go empty.
/// 4. Merge clusters that look alike, largest first.
///
/// Colors come back in the order their aggregates were created, largest first among those
/// that did not merge. An image with no pixel above the alpha threshold yields an empty list.
pub fn extract_colors(
    rgba: &[u8],
    width: u32,
    height: u32,
    options: &ExtractOptions,
) -> Result<Vec<ExtractedColor>, ExtractError> {
    Ok(extract_aggregates(rgba, width, height, options)?
        .iter()
        .map(ExtractedColor::from)
        .collect())
}

/// Same pipeline as [`extract_colors`], stopping before conversion to output records.
pub fn extract_aggregates(
    rgba: &[u8],
    width: u32,
    height: u32,
    options: &ExtractOptions,
) -> Result<Vec<ColorAggregate>, ExtractError> {
    validate_inputs(rgba.len(), width, height)?;
    options.validate()?;

    // 1. Histogram sampling
    let step = sampler::sampling_step(width, height, options.pixels);
    let samples =
        sampler::build_weighted_samples(rgba, width, height, step, options.alpha_threshold)?;
    debug!(step, samples = samples.len(), "sampled image");
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    // 2. Seeding
    let k = options.max_colors.clamp(1, samples.len());
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let centers = init::kmeans_plus_plus(&samples, k, &mut rng)?;

    // 3. Lloyd refinement
    let mut clusters: Vec<Cluster> = centers.into_iter().map(Cluster::new).collect();
    let iterations = cluster::run(&samples, &mut clusters, cluster::MAX_ITERATIONS)?;
    debug!(k, iterations, "clustering finished");

    // 4. Perceptual merge
    let aggregates = merge::merge_clusters(&clusters, &MergeThresholds::from(options));
    debug!(colors = aggregates.len(), "merged clusters");

    Ok(aggregates)
}

fn validate_inputs(len: usize, width: u32, height: u32) -> Result<(), ExtractError> {
    if width == 0 || height == 0 {
        return Err(ExtractError::ZeroDimension);
    }
    let expected = (width as u64) * (height as u64) * 4;
    if len as u64 != expected {
        return Err(ExtractError::BufferMismatch { len, width, height });
    }
    Ok(())
}

/// Extract colors from an already decoded image.
#[cfg(not(target_arch = "wasm32"))]
pub fn extract_colors_from_image(
    img: &DynamicImage,
    options: &ExtractOptions,
) -> Result<Vec<ExtractedColor>> {
    let rgba8 = img.to_rgba8();
    let (w, h) = rgba8.dimensions();
    let colors = extract_colors(rgba8.as_raw(), w, h, options)
        .with_context(|| format!("color extraction failed for {w}x{h} image"))?;
    Ok(colors)
}

/// Decode an encoded image (PNG, JPEG, ...) and extract its colors.
#[cfg(not(target_arch = "wasm32"))]
pub fn extract_colors_bytes(input: &[u8], options: &ExtractOptions) -> Result<Vec<ExtractedColor>> {
    let img = image::load_from_memory(input).context("unable to decode image")?;
    extract_colors_from_image(&img, options)
}
