pub mod analysis;
pub mod consts;
pub mod diff;
pub mod error;
pub mod filters;
pub mod grid;
pub mod io;
pub mod mask;
pub mod pipeline;
pub mod preprocess;
pub mod visualize;
