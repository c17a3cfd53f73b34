use palette::{FromColor, Hsl, Srgb, encoding};
use serde::Serialize;

/// `sqrt(3)`: the RGB distance between black and white in the unit cube.
const UNIT_CUBE_DIAGONAL: f64 = 1.732_050_807_568_877_2;

/// Squared Euclidean distance in normalized RGB, range [0, 3].
///
/// Only used for comparisons, so no square root and no normalization.
#[inline(always)]
pub(crate) fn distance_squared(a: Srgb<f32>, b: Srgb<f32>) -> f32 {
    let dr = a.red - b.red;
    let dg = a.green - b.green;
    let db = a.blue - b.blue;
    dr * dr + dg * dg + db * db
}

/// Same as [`distance_squared`] but accumulated in `f64`, for the seeding and merge steps.
#[inline(always)]
pub(crate) fn distance_squared_f64(a: Srgb<f32>, b: Srgb<f32>) -> f64 {
    let dr = a.red as f64 - b.red as f64;
    let dg = a.green as f64 - b.green as f64;
    let db = a.blue as f64 - b.blue as f64;
    dr * dr + dg * dg + db * db
}

/// RGB distance normalized to [0, 1], with black vs white at 1.0.
pub fn normalized_distance(a: Srgb<f32>, b: Srgb<f32>) -> f64 {
    distance_squared_f64(a, b).sqrt() / UNIT_CUBE_DIAGONAL
}

/// Shortest distance between two hues around the color wheel. Hues are in [0, 1), result in [0, 0.5].
#[inline]
pub fn hue_arc_distance(h1: f64, h2: f64) -> f64 {
    let d = (h1 - h2).abs();
    if d > 0.5 { 1.0 - d } else { d }
}

/// Cached HSL triple with every component in [0, 1]; hue is a fraction of a full turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslTriple {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl HslTriple {
    pub fn from_rgb(rgb: Srgb<f32>) -> Self {
        let rgb = Srgb::new(
            (rgb.red as f64).clamp(0.0, 1.0),
            (rgb.green as f64).clamp(0.0, 1.0),
            (rgb.blue as f64).clamp(0.0, 1.0),
        );
        let hsl: Hsl<encoding::Srgb, f64> = Hsl::from_color(rgb);

        let mut hue = hsl.hue.into_positive_degrees() / 360.0;
        if !(0.0..1.0).contains(&hue) {
            // 360° (or a NaN from a degenerate input) folds back to red.
            hue = 0.0;
        }

        Self {
            hue,
            saturation: hsl.saturation.clamp(0.0, 1.0),
            lightness: hsl.lightness.clamp(0.0, 1.0),
        }
    }
}

/// One entry of the extracted palette, ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedColor {
    /// `#rrggbb`, lowercase.
    pub hex: String,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub hue: f64,
    /// Mean of the three normalized channels.
    pub intensity: f64,
    pub lightness: f64,
    pub saturation: f64,
    /// Share of the sampled pixels represented by this color, in [0, 1].
    pub area: f64,
}

impl ExtractedColor {
    pub(crate) fn new(rgb: Srgb<f32>, hsl: HslTriple, area: f64) -> Self {
        let r = (rgb.red as f64).clamp(0.0, 1.0);
        let g = (rgb.green as f64).clamp(0.0, 1.0);
        let b = (rgb.blue as f64).clamp(0.0, 1.0);
        let red = channel_to_u8(r);
        let green = channel_to_u8(g);
        let blue = channel_to_u8(b);

        Self {
            hex: format!("#{red:02x}{green:02x}{blue:02x}"),
            red,
            green,
            blue,
            hue: hsl.hue,
            intensity: (r + g + b) / 3.0,
            lightness: hsl.lightness,
            saturation: hsl.saturation,
            area: area.clamp(0.0, 1.0),
        }
    }
}

/// `f64::round` rounds half away from zero, which is what the 8-bit output expects.
#[inline]
fn channel_to_u8(v: f64) -> u8 {
    (v * 255.0).round() as u8
}
