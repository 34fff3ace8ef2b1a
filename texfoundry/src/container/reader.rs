//! Staged container reader: header, metadata blocks, payload.

use super::metadata::face_at;
use super::{
    decode_cube_layout, ContainerError, ContainerHeader, MetadataBlock, KEY_PAYLOAD_CRC,
};
use crate::format::{self, PixelFormat};
use crate::image::CubeFace;
use std::io::Read;
use std::ops::Range;

/// Address of one compressed payload segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSegment {
    pub mip: u32,
    pub surface: u32,
    /// Face position in the file's layout order.
    pub face_position: u32,
    /// Resolved face identity, `None` for flat files.
    pub face: Option<CubeFace>,
    pub width: u32,
    pub height: u32,
    pub range: Range<usize>,
}

/// A container file held in memory: header, ordered metadata blocks and the
/// flat compressed payload.
#[derive(Debug, Clone)]
pub struct ContainerFile {
    pub header: ContainerHeader,
    pub metadata: Vec<MetadataBlock>,
    pub payload: Vec<u8>,
}

impl ContainerFile {
    /// Reads a complete container from a byte stream.
    ///
    /// Stages: header, then metadata blocks while declared metadata bytes
    /// remain, then exactly the payload length implied by the header's
    /// format, dimensions and mip/face counts. A stored CRC block is
    /// verified against the payload.
    pub fn read(reader: &mut impl Read) -> Result<Self, ContainerError> {
        let header = ContainerHeader::read(reader)?;
        let format = header.format()?;

        let mut metadata = Vec::new();
        let mut remaining = header.metadata_size;
        while remaining > 0 {
            metadata.push(MetadataBlock::read(reader, &mut remaining)?);
        }

        // Grown chunk by chunk so a header declaring far more payload than
        // the file carries never forces the full allocation up front.
        let expected = payload_len(format, &header);
        let mut payload = Vec::new();
        let mut chunk = [0u8; 64 * 1024];
        while payload.len() < expected {
            let want = chunk.len().min(expected - payload.len());
            match reader.read(&mut chunk[..want])? {
                0 => {
                    return Err(ContainerError::TruncatedPayload {
                        expected,
                        actual: payload.len(),
                    })
                }
                n => payload.extend_from_slice(&chunk[..n]),
            }
        }

        let file = ContainerFile {
            header,
            metadata,
            payload,
        };
        file.verify_crc()?;
        Ok(file)
    }

    fn verify_crc(&self) -> Result<(), ContainerError> {
        let Some(block) = self.metadata.iter().find(|b| b.key == KEY_PAYLOAD_CRC) else {
            return Ok(());
        };
        if block.data.len() != 4 {
            return Ok(());
        }
        let stored = u32::from_le_bytes(block.data[..4].try_into().unwrap());
        let mut crc = flate2::Crc::new();
        crc.update(&self.payload);
        let computed = crc.sum();
        if stored != computed {
            return Err(ContainerError::CrcMismatch { stored, computed });
        }
        Ok(())
    }

    /// Resolved cube layout word, `None` for flat files.
    pub fn cube_layout(&self) -> Option<u32> {
        decode_cube_layout(&self.metadata, self.header.num_faces)
    }

    /// Payload segments in stream order: outer loop mip level, middle loop
    /// surface, inner loop face.
    pub fn payload_segments(&self) -> Result<Vec<PayloadSegment>, ContainerError> {
        let format = self.header.format()?;
        let layout = self.cube_layout();
        let mut segments = Vec::new();
        let mut offset = 0usize;

        for mip in 0..self.header.mip_count.max(1) {
            let width = (self.header.width >> mip).max(1);
            let height = (self.header.height >> mip).max(1);
            let size = format::data_size(format, width, height);

            for surface in 0..self.header.num_surfaces.max(1) {
                for face_position in 0..self.header.num_faces.max(1) {
                    let face = layout.and_then(|l| face_at(l, face_position));
                    segments.push(PayloadSegment {
                        mip,
                        surface,
                        face_position,
                        face,
                        width,
                        height,
                        range: offset..offset + size,
                    });
                    offset += size;
                }
            }
        }

        Ok(segments)
    }
}

/// Total payload length implied by a header.
pub(super) fn payload_len(format: PixelFormat, header: &ContainerHeader) -> usize {
    let mut total = 0;
    for mip in 0..header.mip_count.max(1) {
        let width = (header.width >> mip).max(1);
        let height = (header.height >> mip).max(1);
        total += format::data_size(format, width, height)
            * header.num_surfaces.max(1) as usize
            * header.num_faces.max(1) as usize;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn flat_header(format: PixelFormat, w: u32, h: u32, mips: u32) -> ContainerHeader {
        ContainerHeader::new(format, w, h, mips)
    }

    fn encode(header: &ContainerHeader, metadata: &[MetadataBlock], payload: &[u8]) -> Vec<u8> {
        let mut header = *header;
        header.metadata_size = metadata.iter().map(|b| b.wire_size()).sum();
        let mut bytes = Vec::new();
        header.write(&mut bytes).unwrap();
        for block in metadata {
            block.write(&mut bytes).unwrap();
        }
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_payload_len_sums_mip_chain() {
        let header = flat_header(PixelFormat::Dxt1, 8, 8, 4);
        // Mips: 8x8=32, 4x4=8, 2x2->one block=8, 1x1->one block=8.
        assert_eq!(payload_len(PixelFormat::Dxt1, &header), 56);
    }

    #[test]
    fn test_read_flat_file() {
        let header = flat_header(PixelFormat::Rgba8888, 2, 2, 1);
        let payload = vec![7u8; 16];
        let bytes = encode(&header, &[], &payload);

        let file = ContainerFile::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(file.payload, payload);
        assert_eq!(file.cube_layout(), None);

        let segments = file.payload_segments().unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].range, 0..16);
        assert_eq!(segments[0].face, None);
    }

    #[test]
    fn test_read_truncated_payload() {
        let header = flat_header(PixelFormat::Rgba8888, 4, 4, 1);
        let bytes = encode(&header, &[], &[0u8; 10]); // needs 64

        assert!(matches!(
            ContainerFile::read(&mut Cursor::new(bytes)),
            Err(ContainerError::TruncatedPayload {
                expected: 64,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_read_verifies_crc() {
        let header = flat_header(PixelFormat::Rgba8888, 1, 1, 1);
        let payload = [1u8, 2, 3, 4];

        let good = encode(&header, &[MetadataBlock::payload_crc(&payload)], &payload);
        assert!(ContainerFile::read(&mut Cursor::new(good)).is_ok());

        let stale = encode(&header, &[MetadataBlock::payload_crc(b"else")], &payload);
        assert!(matches!(
            ContainerFile::read(&mut Cursor::new(stale)),
            Err(ContainerError::CrcMismatch { .. })
        ));
    }

    #[test]
    fn test_segments_are_mip_major_face_minor() {
        let mut header = flat_header(PixelFormat::Dxt1, 8, 8, 2);
        header.num_faces = 6;
        let payload = vec![0u8; payload_len(PixelFormat::Dxt1, &header)];
        let bytes = encode(&header, &[], &payload);

        let file = ContainerFile::read(&mut Cursor::new(bytes)).unwrap();
        let segments = file.payload_segments().unwrap();
        assert_eq!(segments.len(), 12);

        // All faces of mip 0 precede all faces of mip 1.
        assert!(segments[..6].iter().all(|s| s.mip == 0));
        assert!(segments[6..].iter().all(|s| s.mip == 1));
        assert_eq!(segments[5].face, Some(CubeFace::NegativeZ));
        assert_eq!(segments[6].face, Some(CubeFace::PositiveX));

        // Contiguous, in order.
        let mut expected_start = 0;
        for segment in &segments {
            assert_eq!(segment.range.start, expected_start);
            expected_start = segment.range.end;
        }
        assert_eq!(expected_start, payload.len());
    }

    #[test]
    fn test_faces_without_cube_block_use_canonical_order() {
        let mut header = flat_header(PixelFormat::Rgba8888, 1, 1, 1);
        header.num_faces = 6;
        let payload = vec![0u8; 24];
        let bytes = encode(&header, &[], &payload);

        let file = ContainerFile::read(&mut Cursor::new(bytes)).unwrap();
        let faces: Vec<CubeFace> = file
            .payload_segments()
            .unwrap()
            .iter()
            .map(|s| s.face.unwrap())
            .collect();
        assert_eq!(faces, CubeFace::ALL);
    }

    #[test]
    fn test_huge_declared_dimensions_fail_before_sizing() {
        // Sizing a 4294967295x4294967295 payload would overflow; the header
        // bounds check has to reject the file first.
        let mut header = flat_header(PixelFormat::Rgba8888, 4, 4, 1);
        header.width = u32::MAX;
        header.height = u32::MAX;
        let bytes = encode(&header, &[], &[]);

        assert!(matches!(
            ContainerFile::read(&mut Cursor::new(bytes)),
            Err(ContainerError::CorruptHeader(_))
        ));
    }

    #[test]
    fn test_huge_declared_mip_count_fails_before_sizing() {
        let mut header = flat_header(PixelFormat::Rgba8888, 4, 4, 1);
        header.mip_count = u32::MAX;
        let bytes = encode(&header, &[], &[]);

        assert!(matches!(
            ContainerFile::read(&mut Cursor::new(bytes)),
            Err(ContainerError::CorruptHeader(_))
        ));
    }

    #[test]
    fn test_unknown_wire_code_is_unknown_format() {
        let mut header = flat_header(PixelFormat::Rgba8888, 1, 1, 1);
        header.pixel_format = 0xFFFF_FFFF_FFFF_FFFF;
        let bytes = encode(&header, &[], &[]);
        assert!(matches!(
            ContainerFile::read(&mut Cursor::new(bytes)),
            Err(ContainerError::UnknownFormat(_))
        ));
    }
}
