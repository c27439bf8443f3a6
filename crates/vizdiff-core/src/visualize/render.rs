use ndarray::{Array2, Zip};

use crate::consts::{ENHANCE_CONTRAST_FACTOR, ENHANCE_THRESHOLD, OVERLAY_ALPHA};
use crate::diff::pixel::absolute_difference;
use crate::filters::edges::{convolve3x3_grid, EDGE_ENHANCE_MORE};
use crate::filters::levels::contrast;
use crate::filters::morphology::close_then_open;
use crate::grid::{DifferenceMap, PixelGrid};

use super::colormap::jet;

const RED: [f32; 3] = [1.0, 0.0, 0.0];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// Difference map through the JET ramp.
pub fn heatmap(map: &DifferenceMap) -> PixelGrid {
    let shape = map.data.dim();
    let mut red = Array2::<f32>::zeros(shape);
    let mut green = Array2::<f32>::zeros(shape);
    let mut blue = Array2::<f32>::zeros(shape);

    Zip::from(&mut red)
        .and(&mut green)
        .and(&mut blue)
        .and(&map.data)
        .for_each(|r, g, b, &v| {
            let [jr, jg, jb] = jet(v);
            *r = jr;
            *g = jg;
            *b = jb;
        });

    PixelGrid::from_channels(red, green, blue)
}

/// `before` with a translucent red fill over changed pixels.
pub fn overlay(before: &PixelGrid, changed: &Array2<bool>) -> PixelGrid {
    let blend = |ch: &Array2<f32>, tint: f32| {
        let mut out = ch.clone();
        Zip::from(&mut out).and(changed).for_each(|v, &c| {
            if c {
                *v = *v * (1.0 - OVERLAY_ALPHA) + tint * OVERLAY_ALPHA;
            }
        });
        out
    };
    PixelGrid::from_channels(
        blend(&before.red, RED[0]),
        blend(&before.green, RED[1]),
        blend(&before.blue, RED[2]),
    )
}

/// White where changed, black elsewhere.
pub fn binary_mask(changed: &Array2<bool>) -> PixelGrid {
    paint(changed, WHITE, BLACK)
}

/// Per-channel absolute difference, unenhanced.
pub fn raw_diff(before: &PixelGrid, after: &PixelGrid) -> PixelGrid {
    absolute_difference(before, after)
}

/// Raw difference cleaned up into solid change blobs.
///
/// Contrast x2 about the mean, "edge enhance more" sharpening, greyscale
/// threshold, then a 3x3 close/open pass. Rendered black/white.
pub fn enhanced_diff(raw: &PixelGrid) -> PixelGrid {
    let stretched = contrast(raw, ENHANCE_CONTRAST_FACTOR);
    let sharpened = convolve3x3_grid(&stretched, &EDGE_ENHANCE_MORE);
    let binary = sharpened.luminance().mapv(|v| v > ENHANCE_THRESHOLD);
    paint(&close_then_open(&binary), WHITE, BLACK)
}

/// `after` pixels kept where changed (after close/open cleanup), black elsewhere.
pub fn changed_objects(after: &PixelGrid, changed: &Array2<bool>) -> PixelGrid {
    let cleaned = close_then_open(changed);
    let keep = |ch: &Array2<f32>| {
        let mut out = Array2::<f32>::zeros(ch.dim());
        Zip::from(&mut out)
            .and(ch)
            .and(&cleaned)
            .for_each(|o, &v, &c| {
                if c {
                    *o = v;
                }
            });
        out
    };
    after.map_channels(keep)
}

fn paint(mask: &Array2<bool>, on: [f32; 3], off: [f32; 3]) -> PixelGrid {
    let channel = |i: usize| mask.mapv(|m| if m { on[i] } else { off[i] });
    PixelGrid::from_channels(channel(0), channel(1), channel(2))
}
