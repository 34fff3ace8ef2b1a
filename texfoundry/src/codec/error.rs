//! Codec dispatch and transcoding errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// No codec claims the file's extension or recognizes its content.
    #[error("unrecognized image format: {0}")]
    UnrecognizedFormat(String),

    /// Decoding failed, or a decoded format has no usable conversion path.
    #[error("decode failed: {0}")]
    DecodeFail(String),

    /// Encoding failed or the target format cannot be written.
    #[error("encode failed: {0}")]
    EncodeFail(String),

    /// Container-specific parse failure, preserved for diagnostics.
    #[error(transparent)]
    Container(#[from] crate::container::ContainerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for CodecError {
    fn from(err: image::ImageError) -> Self {
        CodecError::DecodeFail(err.to_string())
    }
}

impl From<crate::image::TransformError> for CodecError {
    fn from(err: crate::image::TransformError) -> Self {
        CodecError::DecodeFail(err.to_string())
    }
}
