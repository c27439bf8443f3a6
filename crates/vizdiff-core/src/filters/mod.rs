pub mod edges;
pub mod gaussian_blur;
pub mod levels;
pub mod morphology;
