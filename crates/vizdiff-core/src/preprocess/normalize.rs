use tracing::{debug, info};

use crate::error::{DiffError, Result};
use crate::grid::{Dimensions, PixelGrid};
use crate::mask::{IgnoreRegion, ImageSlot};

use super::config::{PreprocessConfig, ReconcileMode};
use super::resize::{capped_dimensions, crop_grid, resize_grid};

/// Two grids at a common working resolution, plus the decoded and capped size
/// of each input (needed to map ignore regions drawn on the originals).
#[derive(Clone, Debug)]
pub struct NormalizedPair {
    pub before: PixelGrid,
    pub after: PixelGrid,
    pub original_before: Dimensions,
    pub original_after: Dimensions,
    pub capped_before: Dimensions,
    pub capped_after: Dimensions,
    pub reconcile: ReconcileMode,
}

impl NormalizedPair {
    pub fn working_dimensions(&self) -> Dimensions {
        self.before.dimensions()
    }

    /// Decoded size of the given input.
    pub fn original(&self, slot: ImageSlot) -> Dimensions {
        match slot {
            ImageSlot::Before => self.original_before,
            ImageSlot::After => self.original_after,
        }
    }

    /// Size of the given input after the size cap, before reconciliation.
    pub fn capped(&self, slot: ImageSlot) -> Dimensions {
        match slot {
            ImageSlot::Before => self.capped_before,
            ImageSlot::After => self.capped_after,
        }
    }

    /// Map a region drawn on one of the inputs into working pixels.
    ///
    /// `Resample` stretches each capped image over the whole working grid, so
    /// the region stretches with it. `Crop` keeps the capped image's top-left
    /// corner unscaled: the region follows the cap ratio only, and whatever
    /// lies past the crop is clipped when the mask is rasterized.
    pub fn resolve_region(&self, region: &IgnoreRegion) -> Result<IgnoreRegion> {
        region.validate()?;
        let drawn_on = region.space.unwrap_or(self.original(region.owner));
        let frame = match self.reconcile {
            ReconcileMode::Resample => self.working_dimensions(),
            ReconcileMode::Crop => self.capped(region.owner),
        };
        Ok(region.rescaled(drawn_on, frame))
    }
}

/// Bring two decoded grids to one working resolution.
///
/// Step 1 caps each grid's longer side at `max_dimension` (Lanczos3).
/// Step 2, if the capped sizes differ, reconciles both to
/// `min(width) x min(height)` per [`ReconcileMode`]. No dimension is ever
/// upscaled.
pub fn normalize(
    before: &PixelGrid,
    after: &PixelGrid,
    config: &PreprocessConfig,
) -> Result<NormalizedPair> {
    if config.max_dimension == 0 {
        return Err(DiffError::InvalidParameter(
            "max_dimension must be at least 1".into(),
        ));
    }

    let original_before = before.dimensions();
    let original_after = after.dimensions();
    for dims in [original_before, original_after] {
        if dims.is_degenerate() {
            return Err(DiffError::InvalidImage {
                width: dims.width,
                height: dims.height,
            });
        }
    }

    let (capped_before, capped_after) = rayon::join(
        || cap_size(before, config.max_dimension),
        || cap_size(after, config.max_dimension),
    );

    let (capped_before_dims, capped_after_dims) =
        (capped_before.dimensions(), capped_after.dimensions());
    let (before, after) = reconcile(&capped_before, &capped_after, config.reconcile);
    debug!(working = %before.dimensions(), "Normalized image pair");

    Ok(NormalizedPair {
        before,
        after,
        original_before,
        original_after,
        capped_before: capped_before_dims,
        capped_after: capped_after_dims,
        reconcile: config.reconcile,
    })
}

/// Downscale a grid whose longer side exceeds `max_dimension`.
pub fn cap_size(grid: &PixelGrid, max_dimension: u32) -> PixelGrid {
    let dims = grid.dimensions();
    let target = capped_dimensions(dims, max_dimension);
    if target == dims {
        return grid.clone();
    }
    info!(from = %dims, to = %target, "Downscaling oversized image");
    resize_grid(grid, target)
}

/// Bring two grids to `min(width) x min(height)`.
pub fn reconcile(a: &PixelGrid, b: &PixelGrid, mode: ReconcileMode) -> (PixelGrid, PixelGrid) {
    let (da, db) = (a.dimensions(), b.dimensions());
    if da == db {
        return (a.clone(), b.clone());
    }

    let target = Dimensions::new(da.width.min(db.width), da.height.min(db.height));
    info!(before = %da, after = %db, target = %target, mode = %mode, "Reconciling image sizes");

    match mode {
        ReconcileMode::Resample => rayon::join(|| resize_grid(a, target), || resize_grid(b, target)),
        ReconcileMode::Crop => (crop_grid(a, target), crop_grid(b, target)),
    }
}
