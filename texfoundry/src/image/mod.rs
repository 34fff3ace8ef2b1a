//! In-memory image representation and transform engine.
//!
//! [`ImageBuffer`] is the canonical image everywhere in the pipeline: raw
//! pixel bytes plus width, height, format, an optional mipmap level and an
//! optional cube face tag. Buffers are move-only; each pipeline stage
//! consumes its inputs and produces new owned outputs, so no transform here
//! needs to worry about shared aliasing.
//!
//! Transforms on uncompressed formats: nearest-neighbor resampling, canvas
//! padding/cropping, region copy and insert, flips and quarter rotations,
//! and lazy mipmap chain generation via [`MipmapChain`]. Block-compressed
//! buffers can be created and carried but not transformed.

mod buffer;
mod convert;
mod error;
mod mipmap;
mod transform;

pub use buffer::{CubeFace, ImageBuffer};
pub use convert::convert_to_rgba8888;
pub use error::TransformError;
pub use mipmap::MipmapChain;
