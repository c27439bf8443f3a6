use thiserror::Error;

use crate::pipeline::ComparisonStage;

#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Unsupported or unrecognized image format: {0}")]
    InvalidFormat(String),

    #[error("Corrupt image data: {0}")]
    CorruptImage(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidImage { width: u32, height: u32 },

    #[error("Dimension mismatch: {left_w}x{left_h} vs {right_w}x{right_h}")]
    DimensionMismatch {
        left_w: u32,
        left_h: u32,
        right_w: u32,
        right_h: u32,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, DiffError>;

/// A comparison failure, tagged with the pipeline stage that raised it.
#[derive(Error, Debug)]
#[error("{stage} failed: {error}")]
pub struct StageError {
    pub stage: ComparisonStage,
    #[source]
    pub error: DiffError,
}
