pub mod config;
pub mod normalize;
pub mod resize;

pub use config::{PreprocessConfig, ReconcileMode};
pub use normalize::{normalize, NormalizedPair};
