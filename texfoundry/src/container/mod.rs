//! Binary container format for compressed textures.
//!
//! On-disk layout, all integers little-endian:
//!
//! ```text
//! [52-byte header][metadata blocks, header.metadata_size bytes][payload]
//! ```
//!
//! The header carries the pixel format wire code, dimensions, mip and face
//! counts and the total metadata length. Each metadata block is
//! `four_cc:u32 | key:u32 | data_len:u32 | data`. Two keys are recognized:
//! the cubemap face order (a six-character axis string) and a CRC32 of the
//! payload. Unknown blocks are carried through reads and writes untouched.
//!
//! The payload is a flat byte stream ordered mip-major: all faces of mip 0
//! precede all faces of mip 1. Segment lengths derive from
//! [`crate::format::data_size`] for the halved dimensions of each level.
//!
//! Byte-swapped (big-endian authored) files are detected and rejected, not
//! converted; see [`ContainerError::ByteSwappedUnsupported`].

mod error;
mod header;
mod metadata;
mod reader;
mod writer;

pub use error::ContainerError;
pub use header::{
    ContainerHeader, CONTAINER_MAGIC, CONTAINER_MAGIC_SWAPPED, HEADER_SIZE, MAX_DIMENSION,
    MAX_MIP_LEVELS, MAX_SURFACES,
};
pub use metadata::{
    decode_cube_layout, MetadataBlock, KEY_CUBE_MAP_ORDER, KEY_PAYLOAD_CRC,
    METADATA_BLOCK_PREFIX,
};
pub use reader::{ContainerFile, PayloadSegment};
