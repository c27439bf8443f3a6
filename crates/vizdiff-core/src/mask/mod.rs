pub mod rasterize;
pub mod region;

pub use rasterize::build_mask;
pub use region::{IgnoreRegion, ImageSlot, Point, RegionShape};
