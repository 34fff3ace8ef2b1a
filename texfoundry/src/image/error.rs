//! Error types for image transform operations.

use crate::format::PixelFormat;
use thiserror::Error;

/// Errors signalled by transform preconditions.
///
/// These are caller-defect errors, not recoverable runtime conditions: they
/// are surfaced as `Result`s so callers can fail loudly, and the offending
/// operation leaves the buffer untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Source and destination pixel formats differ where they must match.
    #[error("pixel format mismatch: {src} vs {dst}", src = .src.name(), dst = .dst.name())]
    FormatMismatch { src: PixelFormat, dst: PixelFormat },

    /// Rotation requires a square image.
    #[error("image is not square: {width}x{height}")]
    NotSquare { width: u32, height: u32 },

    /// The operation is not defined for this pixel format.
    #[error("transform not supported for format {}", .0.name())]
    UnsupportedTransform(PixelFormat),

    /// Rotation angle is not a multiple of 90 degrees.
    #[error("unsupported rotation angle: {0} degrees")]
    UnsupportedAngle(i32),

    /// A region has no intersection with the image it addresses.
    #[error("region {width}x{height} at ({x}, {y}) lies outside the image")]
    InvalidRegion { x: u32, y: u32, width: u32, height: u32 },

    /// Supplied byte data does not match the computed image size.
    #[error("data size mismatch: got {got} bytes, expected {expected}")]
    DataSizeMismatch { got: usize, expected: usize },

    /// Image dimensions must be at least 1x1.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
