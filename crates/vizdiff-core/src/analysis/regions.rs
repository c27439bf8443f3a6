use ndarray::{s, Array2, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    BRIGHTNESS_CHANGE_DELTA, CHANGE_ANALYSIS_REGIONS, COLOR_CHANGE_DISTANCE, MAX_REPORTED_REGIONS,
    MIN_REGION_AREA,
};
use crate::filters::morphology::close_then_open;
use crate::grid::{DifferenceMap, ExclusionMask, PixelGrid};
use crate::mask::Point;

use super::components::{label_components, Extent};

/// Axis-aligned pixel rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn center(&self) -> Point {
        Point::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }
}

/// One connected area of change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifferenceRegion {
    /// Rank by area, 0 = largest.
    pub id: usize,
    /// Pixel count of the region.
    pub area: usize,
    pub bbox: BoundingBox,
    pub center: Point,
}

/// Rough classification of the largest regions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeTypes {
    pub color_changes: usize,
    pub new_objects: usize,
    pub removed_objects: usize,
}

/// Where and how the two images differ.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifferenceAnalysis {
    /// Any non-excluded pixel differs at all, regardless of sensitivity.
    pub has_differences: bool,
    /// Bounds of every non-excluded pixel with a non-zero difference.
    pub difference_bbox: Option<BoundingBox>,
    /// Largest change regions, at most [`MAX_REPORTED_REGIONS`].
    pub regions: Vec<DifferenceRegion>,
    pub change_types: ChangeTypes,
}

/// Locate and classify changed areas.
///
/// `changed` is the thresholded change grid; it is cleaned with a close/open
/// pass and restricted to non-excluded pixels before labeling.
pub fn analyze_differences(
    before: &PixelGrid,
    after: &PixelGrid,
    difference_map: &DifferenceMap,
    changed: &Array2<bool>,
    mask: &ExclusionMask,
) -> DifferenceAnalysis {
    let difference_bbox = nonzero_bbox(&difference_map.data, mask);

    let mut cleaned = close_then_open(changed);
    Zip::from(&mut cleaned).and(mask).for_each(|c, &excluded| {
        if excluded {
            *c = false;
        }
    });

    let regions: Vec<DifferenceRegion> = label_components(&cleaned)
        .into_iter()
        .filter(|c| c.area > MIN_REGION_AREA)
        .take(MAX_REPORTED_REGIONS)
        .enumerate()
        .map(|(id, c)| DifferenceRegion {
            id,
            area: c.area,
            bbox: c.bbox,
            center: c.bbox.center(),
        })
        .collect();

    let change_types = classify_changes(before, after, &regions);

    debug!(
        regions = regions.len(),
        color_changes = change_types.color_changes,
        new_objects = change_types.new_objects,
        removed_objects = change_types.removed_objects,
        "Analyzed difference regions"
    );

    DifferenceAnalysis {
        has_differences: difference_bbox.is_some(),
        difference_bbox,
        regions,
        change_types,
    }
}

fn nonzero_bbox(data: &Array2<f32>, mask: &ExclusionMask) -> Option<BoundingBox> {
    let mut extent: Option<Extent> = None;
    for ((row, col), &v) in data.indexed_iter() {
        if v <= 0.0 || mask[[row, col]] {
            continue;
        }
        match extent.as_mut() {
            Some(e) => e.include(row, col),
            None => extent = Some(Extent::at(row, col)),
        }
    }
    extent.map(|e| e.bbox())
}

/// Compare mean colours of each region's bounding box in both images.
fn classify_changes(
    before: &PixelGrid,
    after: &PixelGrid,
    regions: &[DifferenceRegion],
) -> ChangeTypes {
    let mut types = ChangeTypes::default();

    for region in regions.iter().take(CHANGE_ANALYSIS_REGIONS) {
        let c1 = mean_color(before, &region.bbox);
        let c2 = mean_color(after, &region.bbox);

        let distance = c1
            .iter()
            .zip(c2.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt();
        if distance > COLOR_CHANGE_DISTANCE {
            types.color_changes += 1;
        }

        let brightness1 = c1.iter().sum::<f64>() / 3.0;
        let brightness2 = c2.iter().sum::<f64>() / 3.0;
        if (brightness2 - brightness1).abs() > BRIGHTNESS_CHANGE_DELTA {
            if brightness2 > brightness1 {
                types.new_objects += 1;
            } else {
                types.removed_objects += 1;
            }
        }
    }

    types
}

/// Mean RGB inside `bbox`, on the 0-255 scale.
fn mean_color(grid: &PixelGrid, bbox: &BoundingBox) -> [f64; 3] {
    let rows = bbox.y as usize..(bbox.y + bbox.height) as usize;
    let cols = bbox.x as usize..(bbox.x + bbox.width) as usize;
    grid.channels().map(|ch| {
        let view = ch.slice(s![rows.clone(), cols.clone()]);
        if view.is_empty() {
            return 0.0;
        }
        view.iter().map(|&v| v as f64).sum::<f64>() / view.len() as f64 * 255.0
    })
}
