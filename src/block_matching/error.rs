use std::path::PathBuf;
use thiserror::Error;

use super::region::BoundingBox;

/// A specialized `Result` type for tracking operations.
pub type TrackResult<T> = Result<T, TrackError>;

/// The error type for all tracking operations.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Bounding box {bbox} is not valid for a {width}x{height} frame")]
    InvalidBox {
        bbox: BoundingBox,
        width: u32,
        height: u32,
    },

    #[error(
        "Frames differ in shape: current is {current_width}x{current_height}x{current_channels}, next is {next_width}x{next_height}x{next_channels}"
    )]
    FrameShapeMismatch {
        current_width: u32,
        current_height: u32,
        current_channels: usize,
        next_width: u32,
        next_height: u32,
        next_channels: usize,
    },

    #[error("Patches differ in shape: reference is {reference:?}, candidate is {candidate:?}")]
    PatchShapeMismatch {
        reference: (usize, usize, usize),
        candidate: (usize, usize, usize),
    },

    #[error("Normalized cross-correlation is undefined for a constant patch")]
    DegenerateVariance,

    #[error("Invalid frame: {description}")]
    InvalidFrame { description: String },

    #[error("No frames found in {path:?}")]
    EmptySequence { path: PathBuf },

    #[error("Image codec failed: {source}")]
    Image {
        #[from]
        source: image::ImageError,
    },

    #[error("I/O failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to write track summary: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

impl TrackError {
    /// Whether the error comes from bad caller input rather than from the pixel data
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            TrackError::InvalidBox { .. }
                | TrackError::FrameShapeMismatch { .. }
                | TrackError::PatchShapeMismatch { .. }
                | TrackError::InvalidFrame { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_box_message() {
        let err = TrackError::InvalidBox {
            bbox: BoundingBox::new((0, 0), (30, 4)),
            width: 20,
            height: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("(0,0)-(30,4)"), "got: {msg}");
        assert!(msg.contains("20x20"));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_degenerate_variance_is_not_caller_error() {
        assert!(!TrackError::DegenerateVariance.is_caller_error());
    }
}
