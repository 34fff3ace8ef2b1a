//! Container parsing and encoding errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    /// The leading magic word matches neither recognized identifier.
    #[error("corrupt container header: {0}")]
    CorruptHeader(String),

    /// The file was authored on a machine of opposite endianness. Detected
    /// and rejected rather than transparently converted.
    #[error("byte-swapped container files are not supported")]
    ByteSwappedUnsupported,

    /// A metadata block read ran past the declared metadata size.
    #[error("metadata truncated: block needs {needed} bytes, {remaining} declared bytes remain")]
    TruncatedMetadata { needed: u32, remaining: u32 },

    /// The payload stream ended before all declared mip/face segments.
    #[error("payload truncated: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    /// Stored payload CRC does not match the payload bytes.
    #[error("payload CRC mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    CrcMismatch { stored: u32, computed: u32 },

    /// The header's pixel format code maps to no known format.
    #[error(transparent)]
    UnknownFormat(#[from] crate::format::FormatError),

    /// An image handed to the encoder does not fit the set being written.
    #[error("image set invalid for encoding: {0}")]
    InvalidImageSet(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
