//! Pipeline-ending failures.
//!
//! Single channel failures never appear here; the dispatcher absorbs them
//! into fallback attempts and only reports exhaustion.

use crate::dispatch::{DistributionOutcome, Intent};
use qrflash_canvas::Canvas2dError;
use thiserror::Error;

/// The destination could not be turned into an absolute URL, or an action
/// ran before any code was generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("destination is empty")]
    Empty,

    #[error("{0:?} is not a valid URL, with or without an https:// prefix")]
    Invalid(String),

    #[error("no QR code has been generated yet")]
    NoCode,
}

/// The encoder could not produce a code surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("destination of {len} bytes does not fit in a QR code")]
    CapacityExceeded { len: usize },

    #[error("invalid {role} color {value:?}")]
    InvalidColor { role: &'static str, value: String },

    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    #[error("QR encoding failed: {0}")]
    Failed(String),
}

/// The card could not be composed. No partial artifact is produced.
#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("failed to decode code image: {0}")]
    Decode(String),

    #[error(transparent)]
    Canvas(#[from] Canvas2dError),
}

/// Every failure that ends a user action.
#[derive(Debug, Error)]
pub enum QrFlashError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error("every {intent} channel failed ({} attempted)", attempts.len())]
    AllChannelsFailed {
        intent: Intent,
        attempts: Vec<DistributionOutcome>,
    },
}
