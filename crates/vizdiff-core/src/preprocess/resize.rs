use image::imageops::{self, FilterType};
use ndarray::s;

use crate::grid::{Dimensions, PixelGrid};

/// Dimensions after scaling so the longer side is at most `max_dimension`.
///
/// The longer side lands exactly on `max_dimension`; the shorter side is
/// floored, never below 1 pixel.
pub fn capped_dimensions(dims: Dimensions, max_dimension: u32) -> Dimensions {
    let longer = dims.longer_side();
    if longer <= max_dimension {
        return dims;
    }
    let scale = |side: u32| -> u32 {
        if side == longer {
            max_dimension
        } else {
            ((side as u64 * max_dimension as u64) / longer as u64).max(1) as u32
        }
    };
    Dimensions::new(scale(dims.width), scale(dims.height))
}

/// Lanczos3 resample to `target`. Returns a copy when already at that size.
pub fn resize_grid(grid: &PixelGrid, target: Dimensions) -> PixelGrid {
    if grid.dimensions() == target {
        return grid.clone();
    }
    let src = grid.to_rgb32f();
    let resized = imageops::resize(&src, target.width, target.height, FilterType::Lanczos3);
    PixelGrid::from_rgb32f(&resized)
}

/// Keep the top-left `target` sub-rectangle. `target` must not exceed the grid.
pub fn crop_grid(grid: &PixelGrid, target: Dimensions) -> PixelGrid {
    let h = (target.height as usize).min(grid.height());
    let w = (target.width as usize).min(grid.width());
    grid.map_channels(|ch| ch.slice(s![..h, ..w]).to_owned())
}
