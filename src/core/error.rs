use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("{kind} vector {index} has length {found}, expected {expected}")]
    DimensionMismatch {
        kind: &'static str,
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Got {features} feature vectors but {histograms} histograms")]
    LengthMismatch { features: usize, histograms: usize },
    #[error("All {total} frames were excluded as outliers")]
    AllFramesExcluded { total: usize },
    #[error("Frame index {index} out of range (len {len})")]
    FrameOutOfRange { index: usize, len: usize },
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
}

pub type Result<T> = std::result::Result<T, ReorderError>;
