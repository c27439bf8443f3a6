use approx::assert_abs_diff_eq;
use ndarray::Array2;

use vizdiff_core::diff::mse::masked_mse;
use vizdiff_core::diff::pixel::{count_changes, difference_map};
use vizdiff_core::diff::score::normalized_mse;
use vizdiff_core::diff::ssim::masked_ssim;
use vizdiff_core::diff::{combine_score, compute_difference, sensitivity_threshold};
use vizdiff_core::error::DiffError;
use vizdiff_core::grid::{Dimensions, PixelGrid};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

fn solid(width: u32, height: u32, rgb: [f32; 3]) -> PixelGrid {
    PixelGrid::filled(Dimensions::new(width, height), rgb)
}

fn no_mask(grid: &PixelGrid) -> Array2<bool> {
    Array2::from_elem(grid.red.dim(), false)
}

fn textured(width: u32, height: u32) -> PixelGrid {
    let mut g = solid(width, height, [0.0; 3]);
    for ((row, col), v) in g.red.indexed_iter_mut() {
        *v = ((row * 7 + col * 13) % 17) as f32 / 16.0;
    }
    g.green = g.red.mapv(|v| 1.0 - v);
    g.blue = Array2::from_shape_fn(g.red.dim(), |(row, col)| ((row * 3 + col * 5) % 11) as f32 / 10.0);
    g
}

fn with_square(mut g: PixelGrid, x0: usize, y0: usize, size: usize, rgb: [f32; 3]) -> PixelGrid {
    for row in y0..y0 + size {
        for col in x0..x0 + size {
            g.red[[row, col]] = rgb[0];
            g.green[[row, col]] = rgb[1];
            g.blue[[row, col]] = rgb[2];
        }
    }
    g
}

// ---------------------------------------------------------------------------
// Threshold mapping
// ---------------------------------------------------------------------------

#[test]
fn test_threshold_endpoints() {
    assert_abs_diff_eq!(sensitivity_threshold(1.0), 0.99, epsilon = 1e-6);
    assert_abs_diff_eq!(sensitivity_threshold(50.0), 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(sensitivity_threshold(100.0), 0.0, epsilon = 1e-6);
}

#[test]
fn test_threshold_is_non_increasing() {
    let mut prev = f32::INFINITY;
    for s in 1..=100 {
        let t = sensitivity_threshold(s as f32);
        assert!(t <= prev, "threshold rose at sensitivity {s}");
        prev = t;
    }
}

#[test]
fn test_out_of_range_sensitivity_is_rejected() {
    let g = solid(4, 4, WHITE);
    for s in [0.0, 100.5, -1.0, f32::NAN] {
        let err = compute_difference(&g, &g, &no_mask(&g), s).unwrap_err();
        assert!(matches!(err, DiffError::InvalidParameter(_)), "got: {err:?}");
    }
}

// ---------------------------------------------------------------------------
// Difference map
// ---------------------------------------------------------------------------

#[test]
fn test_difference_map_is_max_channel() {
    let a = solid(3, 2, [0.1, 0.5, 0.9]);
    let b = solid(3, 2, [0.2, 0.1, 0.8]);
    let map = difference_map(&a, &b);
    for &v in map.data.iter() {
        assert_abs_diff_eq!(v, 0.4, epsilon = 1e-6);
    }
}

#[test]
fn test_count_changes_skips_excluded() {
    let changed = Array2::from_shape_vec((2, 2), vec![true, true, false, false]).unwrap();
    let mask = Array2::from_shape_vec((2, 2), vec![true, false, true, false]).unwrap();
    assert_eq!(count_changes(&changed, &mask), (1, 2));
}

// ---------------------------------------------------------------------------
// MSE / SSIM
// ---------------------------------------------------------------------------

#[test]
fn test_mse_of_opposite_colours() {
    let a = solid(5, 5, BLUE);
    let b = solid(5, 5, GREEN);
    assert_abs_diff_eq!(masked_mse(&a, &b, &no_mask(&a)), 2.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn test_mse_ignores_excluded_pixels() {
    let a = solid(10, 10, WHITE);
    let b = with_square(a.clone(), 0, 0, 2, BLUE);
    let mut mask = no_mask(&a);
    mask.slice_mut(ndarray::s![..2, ..2]).fill(true);
    assert_eq!(masked_mse(&a, &b, &mask), 0.0);
    assert!(masked_mse(&a, &b, &no_mask(&a)) > 0.0);
}

#[test]
fn test_ssim_identical_is_one() {
    let g = textured(40, 30);
    let lum = g.luminance();
    assert_abs_diff_eq!(masked_ssim(&lum, &lum, &no_mask(&g)), 1.0, epsilon = 1e-9);
}

#[test]
fn test_ssim_drops_for_different_structure() {
    let a = textured(40, 30);
    let b = solid(40, 30, [0.5, 0.5, 0.5]);
    let s = masked_ssim(&a.luminance(), &b.luminance(), &no_mask(&a));
    assert!(s < 0.5, "got: {s}");
}

#[test]
fn test_ssim_fully_excluded_is_one() {
    let a = textured(20, 20);
    let b = solid(20, 20, BLUE);
    let mask = Array2::from_elem((20, 20), true);
    assert_eq!(masked_ssim(&a.luminance(), &b.luminance(), &mask), 1.0);
}

#[test]
fn test_ssim_tiny_image() {
    let a = solid(1, 1, WHITE);
    let s = masked_ssim(&a.luminance(), &a.luminance(), &no_mask(&a));
    assert_abs_diff_eq!(s, 1.0, epsilon = 1e-9);
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

#[test]
fn test_normalized_mse_is_capped() {
    assert_abs_diff_eq!(normalized_mse(0.01), 10.0, epsilon = 1e-9);
    assert_eq!(normalized_mse(0.5), 100.0);
}

#[test]
fn test_combine_score_bounds() {
    assert_eq!(combine_score(0.0, 1.0, 0.0), 0.0);
    assert_eq!(combine_score(100.0, -1.0, 1.0), 100.0);
}

#[test]
fn test_identical_grids_score_zero() {
    let g = textured(50, 50);
    let report = compute_difference(&g, &g, &no_mask(&g), 50.0).unwrap();
    assert_abs_diff_eq!(report.score, 0.0, epsilon = 1e-9);
    assert_eq!(report.metrics.changed_pixels, 0);
    assert_eq!(report.metrics.total_pixels, 2500);
    assert_eq!(report.metrics.mse, 0.0);
    assert_abs_diff_eq!(report.metrics.ssim, 1.0, epsilon = 1e-9);
}

#[test]
fn test_blue_vs_green_scores_high() {
    let a = solid(64, 64, BLUE);
    let b = solid(64, 64, GREEN);
    let report = compute_difference(&a, &b, &no_mask(&a), 50.0).unwrap();
    assert_eq!(report.metrics.changed_pixels, report.metrics.total_pixels);
    assert!((75.0..=100.0).contains(&report.score), "got: {}", report.score);
}

#[test]
fn test_small_square_scores_low() {
    let a = solid(100, 100, WHITE);
    let b = with_square(a.clone(), 40, 40, 20, [1.0, 0.0, 0.0]);
    let report = compute_difference(&a, &b, &no_mask(&a), 50.0).unwrap();
    assert_abs_diff_eq!(report.metrics.difference_percentage, 4.0, epsilon = 1e-9);
    assert!(report.score > 2.0 && report.score < 20.0, "got: {}", report.score);
}

#[test]
fn test_raising_sensitivity_never_reduces_changes() {
    let a = textured(32, 32);
    let b = a.map_channels(|ch| ch.mapv(|v| (v * 0.7 + 0.1).clamp(0.0, 1.0)));
    let mask = no_mask(&a);
    let mut prev = 0;
    for s in [1.0, 10.0, 25.0, 50.0, 75.0, 90.0, 100.0] {
        let changed = compute_difference(&a, &b, &mask, s).unwrap().metrics.changed_pixels;
        assert!(changed >= prev, "sensitivity {s}: {changed} < {prev}");
        prev = changed;
    }
}

#[test]
fn test_full_exclusion_scores_zero() {
    let a = solid(16, 16, BLUE);
    let b = solid(16, 16, GREEN);
    let mask = Array2::from_elem((16, 16), true);
    let report = compute_difference(&a, &b, &mask, 50.0).unwrap();
    assert_eq!(report.metrics.total_pixels, 0);
    assert_eq!(report.metrics.changed_pixels, 0);
    assert_eq!(report.metrics.difference_percentage, 0.0);
    assert_eq!(report.score, 0.0);
}

#[test]
fn test_mismatched_grids_are_rejected() {
    let a = solid(10, 10, BLUE);
    let b = solid(10, 11, BLUE);
    let err = compute_difference(&a, &b, &no_mask(&a), 50.0).unwrap_err();
    assert!(matches!(err, DiffError::DimensionMismatch { .. }), "got: {err:?}");
}

#[test]
fn test_mismatched_mask_is_rejected() {
    let a = solid(10, 10, BLUE);
    let mask = Array2::from_elem((3, 3), false);
    let err = compute_difference(&a, &a, &mask, 50.0).unwrap_err();
    assert!(matches!(err, DiffError::DimensionMismatch { .. }), "got: {err:?}");
}
