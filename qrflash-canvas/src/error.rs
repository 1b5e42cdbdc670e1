//! Canvas errors.

use thiserror::Error;

pub type Canvas2dResult<T> = Result<T, Canvas2dError>;

#[derive(Debug, Error)]
pub enum Canvas2dError {
    /// Zero, or larger than a pixmap can hold.
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Failed to parse font string: {0}")]
    FontParseError(String),

    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    #[error("PNG encoding error: {0}")]
    PngError(String),

    #[error("Invalid gradient stop offset: {0} (must be 0.0-1.0)")]
    InvalidGradientStop(f64),

    /// An RGBA buffer whose length is not width * height * 4.
    #[error("Image data does not match its size: expected {expected} bytes, got {actual}")]
    ImageDataError { expected: usize, actual: usize },
}

impl From<png::EncodingError> for Canvas2dError {
    fn from(err: png::EncodingError) -> Self {
        Canvas2dError::PngError(err.to_string())
    }
}
