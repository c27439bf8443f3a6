use ndarray::Array2;
use tracing::{debug, warn};

use crate::error::Result;
use crate::grid::{Dimensions, ExclusionMask};

use super::region::{IgnoreRegion, Point, RegionShape};

/// Rasterize ignore regions into an exclusion mask at `resolution`.
///
/// A region with a coordinate space is scaled from it to `resolution` first
/// (`scale = resolution / space` per axis); a region without a space is taken
/// to be in working coordinates already. Shapes cover the pixels whose centre
/// lies inside them. Regions from both images are unioned.
/// Freeform paths with fewer than three points contribute nothing.
pub fn build_mask(resolution: Dimensions, regions: &[IgnoreRegion]) -> Result<ExclusionMask> {
    let (h, w) = (resolution.height as usize, resolution.width as usize);
    let mut mask = Array2::from_elem((h, w), false);

    for region in regions {
        region.validate()?;
        let region = match region.space {
            Some(space) => region.rescaled(space, resolution),
            None => region.clone(),
        };

        match &region.shape {
            RegionShape::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                fill_rectangle(&mut mask, *x, *y, x + width, y + height);
            }
            RegionShape::Freeform { path } => {
                if path.len() < 3 {
                    warn!(points = path.len(), "Ignoring freeform region with fewer than 3 points");
                    continue;
                }
                fill_polygon(&mut mask, path);
            }
        }
    }

    debug!(
        regions = regions.len(),
        excluded = mask.iter().filter(|&&m| m).count(),
        "Built exclusion mask"
    );
    Ok(mask)
}

/// Mark every pixel whose centre lies in `[x0, x1) x [y0, y1)`, clipped.
fn fill_rectangle(mask: &mut ExclusionMask, x0: f64, y0: f64, x1: f64, y1: f64) {
    let (h, w) = mask.dim();
    let col_start = clip_index((x0 - 0.5).ceil(), w);
    let col_end = clip_index((x1 - 0.5).ceil(), w);
    let row_start = clip_index((y0 - 0.5).ceil(), h);
    let row_end = clip_index((y1 - 0.5).ceil(), h);

    for row in row_start..row_end {
        for col in col_start..col_end {
            mask[[row, col]] = true;
        }
    }
}

/// Even-odd scanline fill, sampling each pixel at its centre.
fn fill_polygon(mask: &mut ExclusionMask, path: &[Point]) {
    let (h, w) = mask.dim();
    let min_y = path.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = path.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let row_start = clip_index((min_y - 0.5).floor(), h);
    let row_end = clip_index((max_y + 0.5).ceil(), h);

    let mut crossings: Vec<f64> = Vec::with_capacity(path.len());
    for row in row_start..row_end {
        let yc = row as f64 + 0.5;
        crossings.clear();

        for (i, p) in path.iter().enumerate() {
            let q = path[(i + 1) % path.len()];
            if (p.y <= yc && q.y > yc) || (q.y <= yc && p.y > yc) {
                crossings.push(p.x + (yc - p.y) * (q.x - p.x) / (q.y - p.y));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            // Columns whose centre lies in [span[0], span[1]).
            let col_start = clip_index((span[0] - 0.5).ceil(), w);
            let col_end = clip_index((span[1] - 0.5).ceil(), w);
            for col in col_start..col_end {
                mask[[row, col]] = true;
            }
        }
    }
}

fn clip_index(v: f64, len: usize) -> usize {
    v.clamp(0.0, len as f64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(mask: &ExclusionMask) -> usize {
        mask.iter().filter(|&&m| m).count()
    }

    #[test]
    fn test_fill_rectangle_clips_to_bounds() {
        let mut mask = Array2::from_elem((10, 10), false);
        fill_rectangle(&mut mask, -5.0, -5.0, 3.0, 3.0);
        assert_eq!(count(&mask), 9);
        assert!(mask[[0, 0]] && mask[[2, 2]] && !mask[[3, 3]]);
    }

    #[test]
    fn test_fill_rectangle_samples_pixel_centres() {
        // Columns 10 and 20 are touched but their centres (10.5, 20.5) are outside.
        let mut mask = Array2::from_elem((1, 30), false);
        fill_rectangle(&mut mask, 10.6, 0.0, 20.4, 1.0);
        assert_eq!(count(&mask), 9);
        assert!(!mask[[0, 10]] && mask[[0, 11]] && mask[[0, 19]] && !mask[[0, 20]]);
    }

    #[test]
    fn test_fill_polygon_axis_aligned_square() {
        let mut mask = Array2::from_elem((40, 40), false);
        let square = [
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),
            Point::new(30.0, 30.0),
            Point::new(10.0, 30.0),
        ];
        fill_polygon(&mut mask, &square);
        assert_eq!(count(&mask), 400);
        assert!(mask[[10, 10]] && mask[[29, 29]]);
        assert!(!mask[[30, 30]] && !mask[[9, 10]]);
    }
}
