//! Per-attempt errors inside the asset loader.
//!
//! These never escape [`TextureAssetLoader::load`](super::TextureAssetLoader::load);
//! a failed attempt moves on to the next GPU family and exhaustion resolves
//! to the placeholder.

use super::GpuFamily;
use crate::codec::CodecError;
use crate::format::PixelFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("descriptor declares no source for {0:?}")]
    NoSource(GpuFamily),

    #[error("no images produced for {0:?}")]
    NoImages(GpuFamily),

    #[error(
        "{fmt} image {width}x{height} is below the minimum of {min_width}x{min_height}",
        fmt = .format.name()
    )]
    UnsupportedMinimumSize {
        format: PixelFormat,
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    #[error("cube faces decoded to mixed pixel formats")]
    InconsistentCubeFormats,

    #[error("all texture sources failed for {path}: tried {families:?}")]
    ExhaustedFallback {
        path: String,
        families: Vec<GpuFamily>,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}
