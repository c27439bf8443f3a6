use vizdiff_core::error::DiffError;
use vizdiff_core::grid::{Dimensions, PixelGrid};
use vizdiff_core::mask::{IgnoreRegion, ImageSlot, RegionShape};
use vizdiff_core::preprocess::normalize::{cap_size, reconcile};
use vizdiff_core::preprocess::{normalize, PreprocessConfig, ReconcileMode};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn grid(width: u32, height: u32, rgb: [f32; 3]) -> PixelGrid {
    PixelGrid::filled(Dimensions::new(width, height), rgb)
}

fn indexed_grid(width: u32, height: u32) -> PixelGrid {
    let mut g = grid(width, height, [0.0; 3]);
    for row in 0..height as usize {
        for col in 0..width as usize {
            let v = (row * width as usize + col) as f32 / (width * height) as f32;
            g.red[[row, col]] = v;
            g.green[[row, col]] = 1.0 - v;
            g.blue[[row, col]] = 0.5;
        }
    }
    g
}

// ---------------------------------------------------------------------------
// cap_size
// ---------------------------------------------------------------------------

#[test]
fn test_cap_size_downscales_longer_side_to_max() {
    let capped = cap_size(&grid(300, 120, [0.5, 0.5, 0.5]), 100);
    assert_eq!(capped.dimensions(), Dimensions::new(100, 40));
}

#[test]
fn test_cap_size_keeps_small_grid() {
    let g = indexed_grid(20, 10);
    assert_eq!(cap_size(&g, 100), g);
}

#[test]
fn test_cap_size_keeps_flat_colour() {
    let capped = cap_size(&grid(300, 300, [0.2, 0.4, 0.6]), 64);
    for v in capped.green.iter() {
        assert!((v - 0.4).abs() < 1e-4, "got: {v}");
    }
}

// ---------------------------------------------------------------------------
// reconcile
// ---------------------------------------------------------------------------

#[test]
fn test_reconcile_resample_targets_min_dimensions() {
    let (a, b) = reconcile(
        &grid(80, 30, [1.0, 0.0, 0.0]),
        &grid(50, 60, [0.0, 1.0, 0.0]),
        ReconcileMode::Resample,
    );
    assert_eq!(a.dimensions(), Dimensions::new(50, 30));
    assert_eq!(b.dimensions(), Dimensions::new(50, 30));
}

#[test]
fn test_reconcile_crop_keeps_top_left() {
    let a = indexed_grid(8, 6);
    let b = indexed_grid(5, 9);
    let (ca, cb) = reconcile(&a, &b, ReconcileMode::Crop);
    assert_eq!(ca.dimensions(), Dimensions::new(5, 6));
    assert_eq!(cb.dimensions(), Dimensions::new(5, 6));
    assert_eq!(ca.pixel(5, 4), a.pixel(5, 4));
    assert_eq!(cb.pixel(0, 0), b.pixel(0, 0));
}

// ---------------------------------------------------------------------------
// normalize
// ---------------------------------------------------------------------------

#[test]
fn test_normalize_caps_then_reconciles() {
    // 4000x3000 caps to 2048x1536, then meets 500x500.
    let config = PreprocessConfig::default();
    let pair = normalize(
        &grid(4000, 3000, [0.1, 0.1, 0.1]),
        &grid(500, 500, [0.1, 0.1, 0.1]),
        &config,
    )
    .unwrap();
    assert_eq!(pair.working_dimensions(), Dimensions::new(500, 500));
    assert_eq!(pair.working_dimensions().to_string(), "500x500");
    assert_eq!(pair.original(ImageSlot::Before), Dimensions::new(4000, 3000));
    assert_eq!(pair.original(ImageSlot::After), Dimensions::new(500, 500));
}

fn wide_pair(reconcile: ReconcileMode) -> vizdiff_core::preprocess::NormalizedPair {
    // 400x100 caps to 200x50, then meets 100x100.
    let config = PreprocessConfig {
        max_dimension: 200,
        reconcile,
    };
    normalize(&grid(400, 100, [0.5; 3]), &grid(100, 100, [0.5; 3]), &config).unwrap()
}

#[test]
fn test_resolve_region_with_crop_follows_cap_ratio() {
    let pair = wide_pair(ReconcileMode::Crop);
    assert_eq!(pair.working_dimensions(), Dimensions::new(100, 50));
    assert_eq!(pair.capped(ImageSlot::Before), Dimensions::new(200, 50));
    assert_eq!(pair.capped(ImageSlot::After), Dimensions::new(100, 100));

    let region = pair
        .resolve_region(&IgnoreRegion::rectangle(100.0, 0.0, 100.0, 100.0))
        .unwrap();
    assert_eq!(region.space, None);
    assert_eq!(
        region.shape,
        RegionShape::Rectangle {
            x: 50.0,
            y: 0.0,
            width: 50.0,
            height: 50.0
        }
    );
}

#[test]
fn test_resolve_region_with_resample_stretches_to_working_size() {
    let pair = wide_pair(ReconcileMode::Resample);
    let region = pair
        .resolve_region(&IgnoreRegion::rectangle(100.0, 0.0, 100.0, 100.0))
        .unwrap();
    assert_eq!(
        region.shape,
        RegionShape::Rectangle {
            x: 25.0,
            y: 0.0,
            width: 25.0,
            height: 50.0
        }
    );
}

#[test]
fn test_normalize_never_upscales() {
    let pair = normalize(
        &grid(30, 200, [0.0; 3]),
        &grid(90, 40, [0.0; 3]),
        &PreprocessConfig::default(),
    )
    .unwrap();
    let d = pair.working_dimensions();
    assert!(d.width <= 30 && d.height <= 40, "got: {d}");
}

#[test]
fn test_normalize_rejects_zero_max_dimension() {
    let config = PreprocessConfig {
        max_dimension: 0,
        ..Default::default()
    };
    let err = normalize(&grid(4, 4, [0.0; 3]), &grid(4, 4, [0.0; 3]), &config).unwrap_err();
    assert!(matches!(err, DiffError::InvalidParameter(_)), "got: {err:?}");
}

#[test]
fn test_normalize_rejects_degenerate_grid() {
    let err = normalize(
        &grid(0, 4, [0.0; 3]),
        &grid(4, 4, [0.0; 3]),
        &PreprocessConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DiffError::InvalidImage { width: 0, .. }), "got: {err:?}");
}
