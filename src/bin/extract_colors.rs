use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use extract_colors_wasm::{ExtractOptions, ExtractedColor, extract_colors_bytes};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Extract the dominant colors of an image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image path
    input: PathBuf,

    /// Target number of sampled pixels
    #[arg(long, default_value_t = 64_000)]
    pixels: u32,

    /// Normalized RGB distance (0..1) under which colors merge
    #[arg(long, default_value_t = 0.22)]
    distance: f64,

    /// Saturation difference for the HSL merge test
    #[arg(long = "saturationDistance", default_value_t = 0.2)]
    saturation_distance: f64,

    /// Lightness difference for the HSL merge test
    #[arg(long = "lightnessDistance", default_value_t = 0.2)]
    lightness_distance: f64,

    /// Hue arc difference (0..1, 1 = 360°) for the HSL merge test
    #[arg(long = "hueDistance", default_value_t = 0.083_333_333)]
    hue_distance: f64,

    /// Pixels must have alpha strictly above this value
    #[arg(long = "alphaThreshold", default_value_t = 250)]
    alpha_threshold: u8,

    /// Initial number of k-means clusters
    #[arg(long = "maxColors", default_value_t = 16)]
    max_colors: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> ExtractOptions {
        ExtractOptions {
            pixels: self.pixels,
            distance: self.distance,
            saturation_distance: self.saturation_distance,
            lightness_distance: self.lightness_distance,
            hue_distance: self.hue_distance,
            alpha_threshold: self.alpha_threshold,
            max_colors: self.max_colors,
            seed: self.seed,
        }
    }
}

fn print_text(colors: &[ExtractedColor]) {
    for c in colors {
        println!(
            "{}  area={:.4}  h={:.4} s={:.4} l={:.4}",
            c.hex, c.area, c.hue, c.saturation, c.lightness
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let colors = extract_colors_bytes(&bytes, &args.options())
        .with_context(|| format!("failed to process {}", args.input.display()))?;

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&colors)?),
        Format::Text => print_text(&colors),
    }

    Ok(())
}
