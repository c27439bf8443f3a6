use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ndarray::Array2;

use vizdiff_core::diff::{compute_difference, DifferenceReport};
use vizdiff_core::grid::{Dimensions, PixelGrid};
use vizdiff_core::io::decode;
use vizdiff_core::visualize::render::{binary_mask, changed_objects, heatmap};
use vizdiff_core::visualize::{generate, VisualizationKind, VisualizationOptions};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn scene() -> (PixelGrid, PixelGrid) {
    let before = PixelGrid::filled(Dimensions::new(60, 40), [1.0, 1.0, 1.0]);
    let mut after = before.clone();
    for row in 10..30 {
        for col in 20..40 {
            after.red[[row, col]] = 1.0;
            after.green[[row, col]] = 0.0;
            after.blue[[row, col]] = 0.0;
        }
    }
    (before, after)
}

fn report_for(before: &PixelGrid, after: &PixelGrid) -> DifferenceReport {
    let mask = Array2::from_elem(before.red.dim(), false);
    compute_difference(before, after, &mask, 50.0).unwrap()
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn test_generate_all_kinds_at_working_resolution() {
    let (before, after) = scene();
    let report = report_for(&before, &after);
    let vis = generate(&before, &after, &report, &VisualizationOptions::default()).unwrap();

    assert_eq!(vis.len(), 6);
    for kind in VisualizationKind::ALL {
        let png = vis.get(kind).unwrap_or_else(|| panic!("missing {kind}"));
        assert_eq!(decode(png).unwrap().dimensions(), Dimensions::new(60, 40));
    }
}

#[test]
fn test_generate_respects_options() {
    let (before, after) = scene();
    let report = report_for(&before, &after);

    let none = generate(&before, &after, &report, &VisualizationOptions::none()).unwrap();
    assert!(none.is_empty());

    let only_heatmap = VisualizationOptions {
        heatmap: true,
        ..VisualizationOptions::none()
    };
    let vis = generate(&before, &after, &report, &only_heatmap).unwrap();
    assert_eq!(vis.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![VisualizationKind::Heatmap]);
}

#[test]
fn test_generate_is_deterministic() {
    let (before, after) = scene();
    let report = report_for(&before, &after);
    let options = VisualizationOptions::default();
    let a = generate(&before, &after, &report, &options).unwrap();
    let b = generate(&before, &after, &report, &options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_visualizations_serialize_as_base64_png() {
    let (before, after) = scene();
    let report = report_for(&before, &after);
    let vis = generate(&before, &after, &report, &VisualizationOptions::default()).unwrap();

    let json = serde_json::to_value(&vis).unwrap();
    let map = json.as_object().unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    for key in [
        "heatmap",
        "overlay",
        "binary_mask",
        "raw_diff",
        "enhanced_diff",
        "changed_objects",
    ] {
        assert!(keys.contains(&key), "missing {key}");
    }

    let heatmap_b64 = map["heatmap"].as_str().unwrap();
    let bytes = STANDARD.decode(heatmap_b64).unwrap();
    assert_eq!(bytes, vis.get(VisualizationKind::Heatmap).unwrap());
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

#[test]
fn test_heatmap_of_no_difference_is_dark_blue() {
    let (before, _) = scene();
    let report = report_for(&before, &before);
    let rgb = heatmap(&report.difference_map).to_rgb8();
    assert!(rgb.pixels().all(|p| p.0 == [0, 0, 128]));
}

#[test]
fn test_heatmap_marks_change_red() {
    let (before, after) = scene();
    let report = report_for(&before, &after);
    let rgb = heatmap(&report.difference_map).to_rgb8();
    assert_eq!(rgb.get_pixel(25, 15).0, [128, 0, 0]);
    assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 128]);
}

#[test]
fn test_binary_mask_matches_changed_pixels() {
    let (before, after) = scene();
    let report = report_for(&before, &after);
    let rgb = binary_mask(&report.changed).to_rgb8();
    let white = rgb.pixels().filter(|p| p.0 == [255, 255, 255]).count();
    assert_eq!(white, report.metrics.changed_pixels);
}

#[test]
fn test_changed_objects_keeps_after_pixels_only_where_changed() {
    let (before, after) = scene();
    let report = report_for(&before, &after);
    let out = changed_objects(&after, &report.changed);
    assert_eq!(out.pixel(20, 30), [1.0, 0.0, 0.0]);
    assert_eq!(out.pixel(5, 5), [0.0, 0.0, 0.0]);
}
