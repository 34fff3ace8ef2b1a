//! Typed metadata blocks and the cubemap face layout word.

use super::{ContainerError, CONTAINER_MAGIC};
use crate::image::CubeFace;
use std::io::{Read, Write};

/// Bytes of fixed prefix (`four_cc`, `key`, `data_len`) per block.
pub const METADATA_BLOCK_PREFIX: u32 = 12;

/// Key of the cubemap face order block: six axis letters, uppercase for the
/// positive direction (`XxYyZz` subset).
pub const KEY_CUBE_MAP_ORDER: u32 = 2;

/// Key of the payload CRC32 block ("CRC_" as a little-endian u32).
pub const KEY_PAYLOAD_CRC: u32 = 0x5F43_5243;

/// One typed metadata block. Unrecognized keys are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock {
    pub four_cc: u32,
    pub key: u32,
    pub data: Vec<u8>,
}

impl MetadataBlock {
    /// A block under the container's own FourCC namespace.
    pub fn new(key: u32, data: Vec<u8>) -> Self {
        MetadataBlock {
            four_cc: CONTAINER_MAGIC,
            key,
            data,
        }
    }

    /// Cube face order block for the canonical face order.
    pub fn canonical_cube_order() -> Self {
        let letters: Vec<u8> = CubeFace::ALL.iter().map(|f| f.axis_letter()).collect();
        MetadataBlock::new(KEY_CUBE_MAP_ORDER, letters)
    }

    /// CRC32 block over the given payload bytes.
    pub fn payload_crc(payload: &[u8]) -> Self {
        let mut crc = flate2::Crc::new();
        crc.update(payload);
        MetadataBlock::new(KEY_PAYLOAD_CRC, crc.sum().to_le_bytes().to_vec())
    }

    /// Total on-disk size including the fixed prefix.
    pub fn wire_size(&self) -> u32 {
        METADATA_BLOCK_PREFIX + self.data.len() as u32
    }

    /// Reads one block, decrementing `remaining` by the bytes consumed.
    pub fn read(reader: &mut impl Read, remaining: &mut u32) -> Result<Self, ContainerError> {
        if *remaining < METADATA_BLOCK_PREFIX {
            return Err(ContainerError::TruncatedMetadata {
                needed: METADATA_BLOCK_PREFIX,
                remaining: *remaining,
            });
        }

        let mut prefix = [0u8; 12];
        reader.read_exact(&mut prefix)?;
        let four_cc = u32::from_le_bytes(prefix[0..4].try_into().unwrap());
        let key = u32::from_le_bytes(prefix[4..8].try_into().unwrap());
        let data_len = u32::from_le_bytes(prefix[8..12].try_into().unwrap());

        let needed = METADATA_BLOCK_PREFIX + data_len;
        if *remaining < needed {
            return Err(ContainerError::TruncatedMetadata {
                needed,
                remaining: *remaining,
            });
        }

        let mut data = vec![0u8; data_len as usize];
        reader.read_exact(&mut data)?;
        *remaining -= needed;

        Ok(MetadataBlock { four_cc, key, data })
    }

    pub fn write(&self, writer: &mut impl Write) -> Result<(), ContainerError> {
        writer.write_all(&self.four_cc.to_le_bytes())?;
        writer.write_all(&self.key.to_le_bytes())?;
        writer.write_all(&(self.data.len() as u32).to_le_bytes())?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}

/// Resolves the cubemap face layout word for a file.
///
/// Nibble `i` of the result is the face index stored at face position `i`.
/// A cube-order metadata block wins; without one, a file declaring more
/// than one face falls back to the fixed canonical order +X,-X,+Y,-Y,+Z,-Z.
/// Files written without face metadata are only interpretable under that
/// assumption. Returns `None` for flat files.
pub fn decode_cube_layout(blocks: &[MetadataBlock], num_faces: u32) -> Option<u32> {
    if let Some(block) = blocks.iter().find(|b| b.key == KEY_CUBE_MAP_ORDER) {
        let mut layout = 0u32;
        for (position, letter) in block.data.iter().take(6).enumerate() {
            let face = CubeFace::from_axis_letter(*letter)?;
            layout |= face.index() << (position * 4);
        }
        return Some(layout);
    }

    if num_faces > 1 {
        let mut layout = 0u32;
        for (position, face) in CubeFace::ALL.iter().take(num_faces.min(6) as usize).enumerate() {
            layout |= face.index() << (position * 4);
        }
        return Some(layout);
    }

    None
}

/// Face stored at `position` in a layout word.
pub(crate) fn face_at(layout: u32, position: u32) -> Option<CubeFace> {
    CubeFace::from_index((layout >> (position * 4)) & 0xF)
}
