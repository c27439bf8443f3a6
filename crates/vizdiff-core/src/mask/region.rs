use serde::{Deserialize, Serialize};

use crate::error::{DiffError, Result};
use crate::grid::Dimensions;

/// Which of the two compared images something belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    #[default]
    Before,
    After,
}

/// A vertex of a freeform region, in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometry of an ignore region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegionShape {
    /// Axis-aligned rectangle anchored at its top-left corner.
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Closed polygon; the last point connects back to the first.
    Freeform { path: Vec<Point> },
}

/// An area excluded from scoring (but still drawn in visualizations).
///
/// Coordinates are expressed in `space`, the pixel size of the image the
/// region was drawn on. `None` means the owner's original decoded size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IgnoreRegion {
    #[serde(default)]
    pub owner: ImageSlot,
    #[serde(flatten)]
    pub shape: RegionShape,
    #[serde(default)]
    pub space: Option<Dimensions>,
}

impl IgnoreRegion {
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            owner: ImageSlot::default(),
            shape: RegionShape::Rectangle {
                x,
                y,
                width,
                height,
            },
            space: None,
        }
    }

    pub fn freeform(path: Vec<Point>) -> Self {
        Self {
            owner: ImageSlot::default(),
            shape: RegionShape::Freeform { path },
            space: None,
        }
    }

    pub fn owned_by(mut self, owner: ImageSlot) -> Self {
        self.owner = owner;
        self
    }

    pub fn in_space(mut self, space: Dimensions) -> Self {
        self.space = Some(space);
        self
    }

    /// Re-express the region in `to` pixels, given coordinates in `from` pixels.
    ///
    /// The result carries no coordinate space of its own.
    pub fn rescaled(&self, from: Dimensions, to: Dimensions) -> Self {
        let sx = to.width as f64 / from.width as f64;
        let sy = to.height as f64 / from.height as f64;
        let shape = match &self.shape {
            RegionShape::Rectangle {
                x,
                y,
                width,
                height,
            } => RegionShape::Rectangle {
                x: x * sx,
                y: y * sy,
                width: width * sx,
                height: height * sy,
            },
            RegionShape::Freeform { path } => RegionShape::Freeform {
                path: path.iter().map(|p| Point::new(p.x * sx, p.y * sy)).collect(),
            },
        };
        Self {
            owner: self.owner,
            shape,
            space: None,
        }
    }

    /// A freeform path with fewer than three points encloses nothing.
    pub fn is_degenerate(&self) -> bool {
        matches!(&self.shape, RegionShape::Freeform { path } if path.len() < 3)
    }

    /// Reject geometry that cannot be rasterized.
    pub fn validate(&self) -> Result<()> {
        if let Some(space) = self.space {
            if space.is_degenerate() {
                return Err(DiffError::InvalidParameter(format!(
                    "region coordinate space {space} is empty"
                )));
            }
        }

        match &self.shape {
            RegionShape::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                if ![x, y, width, height].iter().all(|v| v.is_finite()) {
                    return Err(DiffError::InvalidParameter(
                        "rectangle coordinates must be finite".into(),
                    ));
                }
                if *width < 0.0 || *height < 0.0 {
                    return Err(DiffError::InvalidParameter(format!(
                        "rectangle size must be non-negative, got {width}x{height}"
                    )));
                }
            }
            RegionShape::Freeform { path } => {
                if path.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                    return Err(DiffError::InvalidParameter(
                        "freeform path coordinates must be finite".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}
