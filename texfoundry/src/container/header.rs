//! Fixed-size container header.

use super::ContainerError;
use crate::format::PixelFormat;
use std::io::{Read, Write};

/// Native magic word ("PVR3" read as a little-endian u32).
pub const CONTAINER_MAGIC: u32 = 0x0352_5650;
/// The same word as written by a big-endian producer.
pub const CONTAINER_MAGIC_SWAPPED: u32 = 0x5056_5203;

/// Header size on disk, bytes.
pub const HEADER_SIZE: usize = 52;

/// Largest texture dimension a header may declare.
pub const MAX_DIMENSION: u32 = 65_536;
/// A `MAX_DIMENSION` texture halves to 1x1 in 17 levels.
pub const MAX_MIP_LEVELS: u32 = 17;
/// Largest surface count a header may declare.
pub const MAX_SURFACES: u32 = 256;

/// Parsed fixed header. Field order matches the wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub flags: u32,
    pub pixel_format: u64,
    pub color_space: u32,
    pub channel_type: u32,
    pub height: u32,
    pub width: u32,
    pub depth: u32,
    pub num_surfaces: u32,
    pub num_faces: u32,
    pub mip_count: u32,
    pub metadata_size: u32,
}

impl ContainerHeader {
    /// Header for a flat (non-cubemap) image set.
    pub fn new(format: PixelFormat, width: u32, height: u32, mip_count: u32) -> Self {
        ContainerHeader {
            flags: 0,
            pixel_format: format.wire_code(),
            color_space: 0,
            channel_type: 0,
            height,
            width,
            depth: 1,
            num_surfaces: 1,
            num_faces: 1,
            mip_count,
            metadata_size: 0,
        }
    }

    /// Resolved pixel format of the payload.
    pub fn format(&self) -> Result<PixelFormat, ContainerError> {
        Ok(PixelFormat::from_wire_code(self.pixel_format)?)
    }

    /// Rejects field values no well-formed file can carry. Payload sizing
    /// multiplies dimensions, mip count, surface and face counts together,
    /// so unbounded values from a corrupt header would overflow or allocate
    /// without limit before any payload byte is read.
    fn validate(&self) -> Result<(), ContainerError> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_DIMENSION
            || self.height > MAX_DIMENSION
        {
            return Err(ContainerError::CorruptHeader(format!(
                "implausible dimensions {}x{}",
                self.width, self.height
            )));
        }
        if self.mip_count > MAX_MIP_LEVELS {
            return Err(ContainerError::CorruptHeader(format!(
                "implausible mip count {}",
                self.mip_count
            )));
        }
        if self.num_faces > 6 {
            return Err(ContainerError::CorruptHeader(format!(
                "implausible face count {}",
                self.num_faces
            )));
        }
        if self.num_surfaces > MAX_SURFACES {
            return Err(ContainerError::CorruptHeader(format!(
                "implausible surface count {}",
                self.num_surfaces
            )));
        }
        Ok(())
    }

    /// Reads and validates the magic word, then the remaining fields,
    /// bounds-checked against the `MAX_*` limits.
    pub fn read(reader: &mut impl Read) -> Result<Self, ContainerError> {
        let mut bytes = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut bytes)
            .map_err(|e| ContainerError::CorruptHeader(format!("header too short: {e}")))?;

        let word = |i: usize| u32::from_le_bytes(bytes[i..i + 4].try_into().unwrap());

        match word(0) {
            CONTAINER_MAGIC => {}
            CONTAINER_MAGIC_SWAPPED => return Err(ContainerError::ByteSwappedUnsupported),
            other => {
                return Err(ContainerError::CorruptHeader(format!(
                    "unrecognized identifier {other:#010x}"
                )))
            }
        }

        let header = ContainerHeader {
            flags: word(4),
            pixel_format: u64::from_le_bytes(bytes[8..16].try_into().unwrap()),
            color_space: word(16),
            channel_type: word(20),
            height: word(24),
            width: word(28),
            depth: word(32),
            num_surfaces: word(36),
            num_faces: word(40),
            mip_count: word(44),
            metadata_size: word(48),
        };
        header.validate()?;
        Ok(header)
    }

    pub fn write(&self, writer: &mut impl Write) -> Result<(), ContainerError> {
        writer.write_all(&CONTAINER_MAGIC.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;
        writer.write_all(&self.pixel_format.to_le_bytes())?;
        writer.write_all(&self.color_space.to_le_bytes())?;
        writer.write_all(&self.channel_type.to_le_bytes())?;
        writer.write_all(&self.height.to_le_bytes())?;
        writer.write_all(&self.width.to_le_bytes())?;
        writer.write_all(&self.depth.to_le_bytes())?;
        writer.write_all(&self.num_surfaces.to_le_bytes())?;
        writer.write_all(&self.num_faces.to_le_bytes())?;
        writer.write_all(&self.mip_count.to_le_bytes())?;
        writer.write_all(&self.metadata_size.to_le_bytes())?;
        Ok(())
    }
}
