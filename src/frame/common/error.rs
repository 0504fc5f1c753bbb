use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Window index {index} out of range for CCD with {nwin} windows")]
    WindowIndex { index: usize, nwin: usize },

    #[error("Invalid percentile: {0}")]
    InvalidPercentile(f64),

    #[error("Maximum dimensions did not match: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Could not crop any window of CCD to match window {0} of other")]
    CropMismatch(usize),

    #[error("Window shapes differ: {0:?} vs {1:?}")]
    ShapeMismatch((usize, usize), (usize, usize)),

    #[error("Window counts differ: {0} vs {1}")]
    WindowCountMismatch(usize, usize),

    #[error("Window {0} lies outside the {1}x{2} frame")]
    OutOfBounds(usize, usize, usize),

    #[error("Windows {0} and {1} overlap")]
    Overlap(usize, usize),

    #[error("CCD contains no pixels")]
    NoPixels,

    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, FrameError>;
