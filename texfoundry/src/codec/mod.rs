//! Polymorphic image codecs and the dispatcher that selects between them.
//!
//! Each on-disk format gets one [`ImageCodec`] implementation: PNG, the
//! compressed-texture container, JPEG and WebP. Codecs are selected by the
//! [`CodecDispatcher`], first by file extension, then by content sniffing
//! in registration order when no codec claims the extension.
//!
//! # Dispatch policy
//!
//! Extension match wins and is final: if the extension-selected codec fails
//! to decode, the failure is returned as-is and no other codec is tried.
//! Content sniffing applies only to paths with an unclaimed or missing
//! extension. This keeps dispatch deterministic for misnamed files.

mod container;
mod dispatcher;
mod error;
mod jpeg;
mod png;
mod raster;
mod webp;

pub use container::ContainerCodec;
pub use dispatcher::CodecDispatcher;
pub use error::CodecError;
pub use jpeg::JpegCodec;
pub use png::PngCodec;
pub use webp::WebpCodec;

use crate::format::PixelFormat;
use crate::image::ImageBuffer;
use std::path::Path;

/// Configuration for one load call. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingParams {
    /// Mip levels to skip from the start of an on-disk chain.
    pub base_mipmap: u32,
    /// Mip index to assign to the first image produced by this call.
    pub first_mipmap_index: u32,
    /// Smallest usable width for block-compressed images.
    pub minimal_width: u32,
    /// Smallest usable height for block-compressed images.
    pub minimal_height: u32,
}

impl Default for LoadingParams {
    fn default() -> Self {
        LoadingParams {
            base_mipmap: 0,
            first_mipmap_index: 0,
            minimal_width: 8,
            minimal_height: 8,
        }
    }
}

/// Dimensions and format of a file, available without a full decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub mip_count: u32,
    pub face_count: u32,
}

/// One on-disk image format handler.
pub trait ImageCodec: Send + Sync {
    /// Codec name for logs.
    fn name(&self) -> &'static str;

    /// File extensions this codec claims, lowercase.
    fn extensions(&self) -> &'static [&'static str];

    /// Extension-based detection.
    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.extensions().iter().any(|known| *known == e)
            })
            .unwrap_or(false)
    }

    /// Content-based detection, a cheap magic-number check.
    fn matches_content(&self, bytes: &[u8]) -> bool;

    /// Decodes the full image set carried by `bytes`.
    fn decode(&self, bytes: &[u8], params: &LoadingParams)
        -> Result<Vec<ImageBuffer>, CodecError>;

    /// Encodes an image set to `path`.
    fn encode(
        &self,
        path: &Path,
        images: &[ImageBuffer],
        target_format: PixelFormat,
        quality: u8,
    ) -> Result<(), CodecError>;

    /// Dimensions and format without a full decode.
    fn probe(&self, bytes: &[u8]) -> Result<ImageInfo, CodecError>;
}
