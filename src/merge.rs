use palette::Srgb;

use crate::cluster::Cluster;
use crate::color::{ExtractedColor, HslTriple, hue_arc_distance, normalized_distance};
use crate::options::ExtractOptions;

/// A merged palette entry. `weight` is raw sample weight until [`merge_clusters`] normalizes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAggregate {
    pub color: Srgb<f32>,
    pub weight: f64,
    pub hsl: HslTriple,
}

impl ColorAggregate {
    fn absorb(&mut self, color: Srgb<f32>, weight: f64) {
        let total = self.weight + weight;
        if total > 0.0 {
            let mix = |a: f32, b: f32| ((a as f64 * self.weight + b as f64 * weight) / total) as f32;
            self.color = Srgb::new(
                mix(self.color.red, color.red),
                mix(self.color.green, color.green),
                mix(self.color.blue, color.blue),
            );
        }
        self.weight = total;
        self.hsl = HslTriple::from_rgb(self.color);
    }
}

impl From<&ColorAggregate> for ExtractedColor {
    fn from(agg: &ColorAggregate) -> Self {
        ExtractedColor::new(agg.color, agg.hsl, agg.weight)
    }
}

/// Thresholds for the two similarity tests.
#[derive(Debug, Clone, Copy)]
pub struct MergeThresholds {
    pub distance: f64,
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl From<&ExtractOptions> for MergeThresholds {
    fn from(o: &ExtractOptions) -> Self {
        Self {
            distance: o.distance,
            hue: o.hue_distance,
            saturation: o.saturation_distance,
            lightness: o.lightness_distance,
        }
    }
}

impl MergeThresholds {
    /// Either test is enough: close in normalized RGB, or close in all of H, S and L.
    fn similar(&self, color: Srgb<f32>, hsl: HslTriple, agg: &ColorAggregate) -> bool {
        normalized_distance(color, agg.color) <= self.distance
            || (hue_arc_distance(hsl.hue, agg.hsl.hue) < self.hue
                && (hsl.saturation - agg.hsl.saturation).abs() < self.saturation
                && (hsl.lightness - agg.hsl.lightness).abs() < self.lightness)
    }
}

/// Fold clusters into perceptually distinct aggregates.
///
/// Clusters are visited heaviest first (stable, so equal weights keep their original
/// order) and each one joins the first existing aggregate it is similar to. Aggregates
/// keep creation order and their weights come back as fractions of the total cluster weight.
pub fn merge_clusters(clusters: &[Cluster], thresholds: &MergeThresholds) -> Vec<ColorAggregate> {
    let total: f64 = clusters.iter().map(|c| c.weight).sum();

    let mut order: Vec<&Cluster> = clusters.iter().collect();
    order.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let mut aggregates: Vec<ColorAggregate> = Vec::with_capacity(clusters.len());
    for cluster in order {
        if cluster.weight <= 0.0 {
            continue;
        }
        let hsl = HslTriple::from_rgb(cluster.color);

        match aggregates
            .iter_mut()
            .find(|agg| thresholds.similar(cluster.color, hsl, agg))
        {
            Some(agg) => agg.absorb(cluster.color, cluster.weight),
            None => aggregates.push(ColorAggregate {
                color: cluster.color,
                weight: cluster.weight,
                hsl,
            }),
        }
    }

    for agg in &mut aggregates {
        agg.weight = if total > 0.0 { agg.weight / total } else { 0.0 };
    }

    aggregates
}
