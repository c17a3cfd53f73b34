use crate::error::ExtractError;

/// Tuning knobs for [`crate::extract_colors`].
///
/// Every field has a default matching the classic `extract-colors` behaviour and can be
/// overridden independently through the builder setters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Target number of sampled pixels. The image is walked on a regular grid whose step is
    /// chosen so that roughly this many pixels are visited. `0` disables subsampling.
    pub pixels: u32,
    /// Normalized RGB distance (0..=1, black vs white ≈ 1) under which two colors merge.
    /// Negative thresholds disable the corresponding test.
    pub distance: f64,
    /// Maximum saturation difference for the HSL merge test.
    pub saturation_distance: f64,
    /// Maximum lightness difference for the HSL merge test.
    pub lightness_distance: f64,
    /// Maximum hue arc difference (0..=0.5, where 1.0 is a full turn) for the HSL merge test.
    pub hue_distance: f64,
    /// Pixels are kept only when their alpha is strictly greater than this value.
    pub alpha_threshold: u8,
    /// Initial cluster count. Clamped to the number of distinct samples, and to at least 1.
    pub max_colors: usize,
    /// Seed for the KMeans++ initialization. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pixels: 64_000,
            distance: 0.22,
            saturation_distance: 0.2,
            lightness_distance: 0.2,
            hue_distance: 0.083_333_333,
            alpha_threshold: 250,
            max_colors: 16,
            seed: None,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixels(mut self, n: u32) -> Self {
        self.pixels = n;
        self
    }

    pub fn distance(mut self, d: f64) -> Self {
        self.distance = d;
        self
    }

    pub fn saturation_distance(mut self, d: f64) -> Self {
        self.saturation_distance = d;
        self
    }

    pub fn lightness_distance(mut self, d: f64) -> Self {
        self.lightness_distance = d;
        self
    }

    pub fn hue_distance(mut self, d: f64) -> Self {
        self.hue_distance = d;
        self
    }

    pub fn alpha_threshold(mut self, a: u8) -> Self {
        self.alpha_threshold = a;
        self
    }

    pub fn max_colors(mut self, k: usize) -> Self {
        self.max_colors = k;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ExtractError> {
        let thresholds = [
            ("distance", self.distance),
            ("saturation_distance", self.saturation_distance),
            ("lightness_distance", self.lightness_distance),
            ("hue_distance", self.hue_distance),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(ExtractError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}
