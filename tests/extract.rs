use extract_colors_wasm::{ExtractError, ExtractOptions, extract_colors, extract_colors_bytes};

fn solid(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    px.iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect()
}

fn gradient(width: u32, height: u32) -> Vec<u8> {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            let b = ((x + y) * 255 / (width + height)) as u8;
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }
    rgba
}

#[test]
fn all_white_image_is_one_white_color() {
    let rgba = solid(2, 2, [255, 255, 255, 255]);
    let colors = extract_colors(&rgba, 2, 2, &ExtractOptions::default()).unwrap();

    assert_eq!(colors.len(), 1);
    let c = &colors[0];
    assert_eq!(c.hex, "#ffffff");
    assert_eq!((c.red, c.green, c.blue), (255, 255, 255));
    assert_eq!(c.lightness, 1.0);
    assert_eq!(c.saturation, 0.0);
    assert_eq!(c.intensity, 1.0);
    assert!((c.area - 1.0).abs() < 1e-12);
}

#[test]
fn half_red_half_blue_stays_two_colors() {
    let (w, h) = (4u32, 2u32);
    let mut rgba = Vec::new();
    for _ in 0..h {
        for x in 0..w {
            let px = if x < w / 2 { [255, 0, 0, 255] } else { [0, 0, 255, 255] };
            rgba.extend_from_slice(&px);
        }
    }
    let opts = ExtractOptions::new().seed(3);
    let colors = extract_colors(&rgba, w, h, &opts).unwrap();

    assert_eq!(colors.len(), 2);
    for c in &colors {
        assert!((c.area - 0.5).abs() < 1e-9, "{c:?}");
    }
    let red = colors.iter().find(|c| c.hex == "#ff0000").expect("red present");
    let blue = colors.iter().find(|c| c.hex == "#0000ff").expect("blue present");
    assert!(red.hue.abs() < 1e-6);
    assert!((blue.hue - 2.0 / 3.0).abs() < 1e-6);
}

#[test]
fn solid_color_comes_back_quantized() {
    let rgba = solid(8, 8, [100, 150, 200, 255]);
    let colors = extract_colors(&rgba, 8, 8, &ExtractOptions::new().seed(1)).unwrap();

    assert_eq!(colors.len(), 1);
    // Levels 12, 18, 25 of 31.
    assert_eq!((colors[0].red, colors[0].green, colors[0].blue), (99, 148, 206));
    assert_eq!(colors[0].hex, "#6394ce");
    assert!((colors[0].area - 1.0).abs() < 1e-12);
}

#[test]
fn alpha_threshold_is_exclusive() {
    // Left pixel sits exactly on the threshold, right pixel one above it.
    let rgba = vec![255, 0, 0, 250, 0, 0, 255, 251];
    let colors = extract_colors(&rgba, 2, 1, &ExtractOptions::new().seed(0)).unwrap();
    assert_eq!(colors.len(), 1);
    assert_eq!(colors[0].hex, "#0000ff");
}

#[test]
fn fully_transparent_image_yields_empty_palette() {
    let rgba = solid(3, 3, [12, 34, 56, 0]);
    let colors = extract_colors(&rgba, 3, 3, &ExtractOptions::default()).unwrap();
    assert!(colors.is_empty());
}

#[test]
fn rejects_bad_geometry() {
    let rgba = solid(2, 2, [0, 0, 0, 255]);
    assert!(matches!(
        extract_colors(&rgba, 0, 2, &ExtractOptions::default()),
        Err(ExtractError::ZeroDimension)
    ));
    assert!(matches!(
        extract_colors(&rgba, 3, 2, &ExtractOptions::default()),
        Err(ExtractError::BufferMismatch { len: 16, width: 3, height: 2 })
    ));
}

#[test]
fn rejects_invalid_thresholds() {
    let rgba = solid(2, 2, [0, 0, 0, 255]);
    let opts = ExtractOptions::new().saturation_distance(f64::NAN);
    assert!(matches!(
        extract_colors(&rgba, 2, 2, &opts),
        Err(ExtractError::InvalidThreshold { name: "saturation_distance", .. })
    ));
}

#[test]
fn negative_distance_keeps_near_colors_apart() {
    // Two neighbouring quantization buckets that merge under the defaults.
    let rgba = vec![100, 100, 100, 255, 108, 100, 100, 255];
    let merged = extract_colors(&rgba, 2, 1, &ExtractOptions::new().seed(4)).unwrap();
    assert_eq!(merged.len(), 1);

    let opts = ExtractOptions::new()
        .seed(4)
        .distance(-1.0)
        .hue_distance(-1.0)
        .saturation_distance(-1.0)
        .lightness_distance(-1.0);
    let apart = extract_colors(&rgba, 2, 1, &opts).unwrap();
    assert_eq!(apart.len(), 2);
    assert!(apart.iter().all(|c| (c.area - 0.5).abs() < 1e-12));
}

#[test]
fn outputs_stay_in_range_and_areas_sum_to_one() {
    let (w, h) = (64u32, 48u32);
    let rgba = gradient(w, h);
    for seed in 0..8 {
        let opts = ExtractOptions::new().seed(seed).pixels(1_000);
        let colors = extract_colors(&rgba, w, h, &opts).unwrap();
        assert!(!colors.is_empty());

        let mut area = 0.0;
        for c in &colors {
            for v in [c.hue, c.saturation, c.lightness, c.intensity, c.area] {
                assert!(v.is_finite() && (0.0..=1.0).contains(&v), "{c:?}");
            }
            assert!(c.hue < 1.0);
            assert!(c.area > 0.0);
            assert_eq!(c.hex.len(), 7);
            area += c.area;
        }
        assert!((area - 1.0).abs() < 1e-9, "seed {seed}: {area}");
    }
}

#[test]
fn same_seed_same_palette() {
    let (w, h) = (40u32, 40u32);
    let rgba = gradient(w, h);
    let opts = ExtractOptions::new().seed(1234).max_colors(8);
    let a = extract_colors(&rgba, w, h, &opts).unwrap();
    let b = extract_colors(&rgba, w, h, &opts).unwrap();
    assert_eq!(a, b);
}

#[test]
fn more_clusters_than_colors_leaves_no_empty_output() {
    // Three distinct colors, sixteen requested clusters.
    let mut rgba = Vec::new();
    for i in 0..30u32 {
        let px = match i % 3 {
            0 => [0, 0, 0, 255],
            1 => [255, 255, 0, 255],
            _ => [0, 200, 255, 255],
        };
        rgba.extend_from_slice(&px);
    }
    let opts = ExtractOptions::new().seed(5).max_colors(16);
    let colors = extract_colors(&rgba, 30, 1, &opts).unwrap();

    assert_eq!(colors.len(), 3);
    for c in &colors {
        assert!(c.area > 0.0);
        assert!((c.area - 1.0 / 3.0).abs() < 1e-9);
    }
}

#[test]
fn large_image_is_subsampled() {
    let rgba = solid(400, 300, [10, 10, 10, 255]);
    let colors = extract_colors(&rgba, 400, 300, &ExtractOptions::new().pixels(100).seed(2)).unwrap();
    assert_eq!(colors.len(), 1);
    assert!((colors[0].area - 1.0).abs() < 1e-12);
}

#[test]
fn decodes_png_bytes() {
    let img = image::RgbaImage::from_pixel(6, 6, image::Rgba([0, 255, 0, 255]));
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let colors = extract_colors_bytes(&png, &ExtractOptions::new().seed(8)).unwrap();
    assert_eq!(colors.len(), 1);
    assert_eq!(colors[0].hex, "#00ff00");
    assert!((colors[0].hue - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn undecodable_bytes_are_an_error() {
    assert!(extract_colors_bytes(b"not an image", &ExtractOptions::default()).is_err());
}

#[test]
fn serializes_with_flat_keys() {
    let rgba = solid(2, 2, [255, 255, 255, 255]);
    let colors = extract_colors(&rgba, 2, 2, &ExtractOptions::default()).unwrap();
    let json = serde_json::to_value(&colors).unwrap();

    let obj = json[0].as_object().unwrap();
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["area", "blue", "green", "hex", "hue", "intensity", "lightness", "red", "saturation"]
    );
    assert_eq!(json[0]["hex"], "#ffffff");
    assert_eq!(json[0]["red"], 255);
}
