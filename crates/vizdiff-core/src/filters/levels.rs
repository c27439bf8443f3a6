use crate::grid::PixelGrid;

/// Scale contrast around the mean grey level of the image.
///
/// `factor` 1.0 is a no-op, 0.0 gives a flat grey image, >1.0 spreads values
/// away from the mean. Results are clamped to [0.0, 1.0].
pub fn contrast(grid: &PixelGrid, factor: f32) -> PixelGrid {
    let lum = grid.luminance();
    let mean = if lum.is_empty() {
        0.0
    } else {
        lum.iter().map(|&v| v as f64).sum::<f64>() as f32 / lum.len() as f32
    };
    grid.map_channels(|ch| ch.mapv(|v| (mean + (v - mean) * factor).clamp(0.0, 1.0)))
}
