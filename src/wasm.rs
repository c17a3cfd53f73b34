use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::{ExtractOptions, ExtractedColor, extract_colors};

/// Largest palette the JS entry point will ask for.
const MAX_JS_COLORS: usize = 64;

/// Numeric fields of a color as JS numbers, in output order.
fn numeric_fields(c: &ExtractedColor) -> [(&'static str, f64); 8] {
    [
        ("red", c.red as f64),
        ("green", c.green as f64),
        ("blue", c.blue as f64),
        ("hue", c.hue),
        ("intensity", c.intensity),
        ("lightness", c.lightness),
        ("saturation", c.saturation),
        ("area", c.area),
    ]
}

fn color_to_object(c: &ExtractedColor) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &JsValue::from_str("hex"), &JsValue::from_str(&c.hex))?;
    for (key, value) in numeric_fields(c) {
        Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_f64(value))?;
    }
    Ok(obj.into())
}

/// Apply the JS entry point's fallbacks for out-of-range `pixels` and `max_colors`.
fn js_options(
    pixels: i32,
    distance: f64,
    saturation_distance: f64,
    lightness_distance: f64,
    hue_distance: f64,
    alpha_threshold: u8,
    max_colors: i32,
) -> ExtractOptions {
    let defaults = ExtractOptions::default();
    ExtractOptions {
        pixels: if pixels > 0 { pixels as u32 } else { defaults.pixels },
        distance,
        saturation_distance,
        lightness_distance,
        hue_distance,
        alpha_threshold,
        max_colors: match usize::try_from(max_colors) {
            Ok(k) if (1..=MAX_JS_COLORS).contains(&k) => k,
            _ => defaults.max_colors,
        },
        seed: None,
    }
}

/// Extract dominant colors from a raw RGBA buffer (e.g. `ImageData.data`).
///
/// A non-positive `pixels` falls back to the default budget. A `max_colors` outside
/// `1..=64` falls back to the default of 16. Returns an array of plain objects with `hex`,
/// `red`, `green`, `blue`, `hue`, `intensity`, `lightness`, `saturation` and `area`.
#[wasm_bindgen(js_name = extractColors)]
#[allow(clippy::too_many_arguments)]
pub fn extract_colors_js(
    rgba: &[u8],
    width: u32,
    height: u32,
    pixels: i32,
    distance: f64,
    saturation_distance: f64,
    lightness_distance: f64,
    hue_distance: f64,
    alpha_threshold: u8,
    max_colors: i32,
) -> Result<Array, JsValue> {
    let options = js_options(
        pixels,
        distance,
        saturation_distance,
        lightness_distance,
        hue_distance,
        alpha_threshold,
        max_colors,
    );

    let colors = extract_colors(rgba, width, height, &options)
        .map_err(|e| JsValue::from_str(&format!("Unable to extract colors: {e}")))?;

    let out = Array::new();
    for c in &colors {
        let obj = color_to_object(c)?;
        out.push(&obj);
    }
    Ok(out)
}
