pub mod colormap;
pub mod render;

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rayon::prelude::*;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::diff::DifferenceReport;
use crate::error::Result;
use crate::grid::PixelGrid;
use crate::io::encode_png;

/// One rendering of a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationKind {
    Heatmap,
    Overlay,
    BinaryMask,
    RawDiff,
    EnhancedDiff,
    ChangedObjects,
}

impl VisualizationKind {
    pub const ALL: [VisualizationKind; 6] = [
        Self::Heatmap,
        Self::Overlay,
        Self::BinaryMask,
        Self::RawDiff,
        Self::EnhancedDiff,
        Self::ChangedObjects,
    ];

    /// Stable key used in serialized results and output file names.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Heatmap => "heatmap",
            Self::Overlay => "overlay",
            Self::BinaryMask => "binary_mask",
            Self::RawDiff => "raw_diff",
            Self::EnhancedDiff => "enhanced_diff",
            Self::ChangedObjects => "changed_objects",
        }
    }
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which renderings to produce. All on by default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationOptions {
    #[serde(default = "default_true")]
    pub heatmap: bool,
    #[serde(default = "default_true")]
    pub overlay: bool,
    #[serde(default = "default_true")]
    pub binary_mask: bool,
    #[serde(default = "default_true")]
    pub raw_diff: bool,
    #[serde(default = "default_true")]
    pub enhanced_diff: bool,
    #[serde(default = "default_true")]
    pub changed_objects: bool,
}

fn default_true() -> bool {
    true
}

impl Default for VisualizationOptions {
    fn default() -> Self {
        Self {
            heatmap: true,
            overlay: true,
            binary_mask: true,
            raw_diff: true,
            enhanced_diff: true,
            changed_objects: true,
        }
    }
}

impl VisualizationOptions {
    /// Every kind switched off.
    pub fn none() -> Self {
        Self {
            heatmap: false,
            overlay: false,
            binary_mask: false,
            raw_diff: false,
            enhanced_diff: false,
            changed_objects: false,
        }
    }

    pub fn is_enabled(&self, kind: VisualizationKind) -> bool {
        match kind {
            VisualizationKind::Heatmap => self.heatmap,
            VisualizationKind::Overlay => self.overlay,
            VisualizationKind::BinaryMask => self.binary_mask,
            VisualizationKind::RawDiff => self.raw_diff,
            VisualizationKind::EnhancedDiff => self.enhanced_diff,
            VisualizationKind::ChangedObjects => self.changed_objects,
        }
    }

    /// Enabled kinds in key order.
    pub fn enabled(&self) -> Vec<VisualizationKind> {
        VisualizationKind::ALL
            .into_iter()
            .filter(|k| self.is_enabled(*k))
            .collect()
    }
}

/// Encoded PNG renderings keyed by kind.
///
/// Serializes as a map of kind key to base64-encoded PNG.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Visualizations {
    images: BTreeMap<VisualizationKind, Vec<u8>>,
}

impl Visualizations {
    pub fn get(&self, kind: VisualizationKind) -> Option<&[u8]> {
        self.images.get(&kind).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisualizationKind, &[u8])> {
        self.images.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

impl Serialize for Visualizations {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.images.len()))?;
        for (kind, png) in &self.images {
            map.serialize_entry(kind.key(), &STANDARD.encode(png))?;
        }
        map.end()
    }
}

/// Render and encode every enabled visualization.
///
/// Renderings are independent and run in parallel; output is keyed, so the
/// result does not depend on scheduling.
pub fn generate(
    before: &PixelGrid,
    after: &PixelGrid,
    report: &DifferenceReport,
    options: &VisualizationOptions,
) -> Result<Visualizations> {
    let kinds = options.enabled();

    let images = kinds
        .par_iter()
        .map(|&kind| -> Result<(VisualizationKind, Vec<u8>)> {
            let grid = render_kind(kind, before, after, report);
            let png = encode_png(&grid)?;
            debug!(%kind, bytes = png.len(), "Encoded visualization");
            Ok((kind, png))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(Visualizations { images })
}

/// Render one visualization without encoding it.
pub fn render_kind(
    kind: VisualizationKind,
    before: &PixelGrid,
    after: &PixelGrid,
    report: &DifferenceReport,
) -> PixelGrid {
    match kind {
        VisualizationKind::Heatmap => render::heatmap(&report.difference_map),
        VisualizationKind::Overlay => render::overlay(before, &report.changed),
        VisualizationKind::BinaryMask => render::binary_mask(&report.changed),
        VisualizationKind::RawDiff => render::raw_diff(before, after),
        VisualizationKind::EnhancedDiff => render::enhanced_diff(&render::raw_diff(before, after)),
        VisualizationKind::ChangedObjects => render::changed_objects(after, &report.changed),
    }
}
