//! TexFoundry - Texture asset pipeline
//!
//! This library loads, transforms and stores game textures: a pixel-format
//! registry describing hardware capabilities, an owned image buffer with
//! geometric transforms and mipmap generation, a binary container format
//! for compressed textures, per-format codecs behind one dispatcher, and
//! an asset loader that walks GPU-family fallbacks and substitutes a
//! checkerboard placeholder when every source fails.

pub mod codec;
pub mod container;
pub mod format;
pub mod image;
pub mod loader;

pub use codec::{CodecDispatcher, CodecError, ImageCodec, ImageInfo, LoadingParams};
pub use format::{HardwareCaps, PixelFormat, PixelFormatRegistry};
pub use image::{CubeFace, ImageBuffer, MipmapChain, TransformError};
pub use loader::{
    GpuFamily, GpuSource, LoadError, LoadedTexture, TextureAssetLoader, TextureDescriptor,
};
