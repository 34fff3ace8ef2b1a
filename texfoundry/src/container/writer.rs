//! Container encoding: the exact inverse of the reader.

use super::reader::payload_len;
use super::{ContainerError, ContainerFile, ContainerHeader, MetadataBlock};
use crate::format;
use crate::image::ImageBuffer;
use std::io::Write;

impl ContainerFile {
    /// Builds a flat (non-cubemap) container from a mip-ordered image set.
    ///
    /// Images are keyed by their mipmap level tag (untagged images count as
    /// mip 0) and concatenated mip-major. Every image must share one pixel
    /// format and halve its dimensions per level.
    pub fn from_images(images: &[ImageBuffer]) -> Result<Self, ContainerError> {
        if images.is_empty() {
            return Err(ContainerError::InvalidImageSet("no images".into()));
        }

        let mut ordered: Vec<&ImageBuffer> = images.iter().collect();
        ordered.sort_by_key(|img| img.mipmap_level().unwrap_or(0));

        let base = ordered[0];
        let mut header =
            ContainerHeader::new(base.format(), base.width(), base.height(), ordered.len() as u32);

        let payload = concat_payload(&ordered, &header)?;
        let metadata = vec![MetadataBlock::payload_crc(&payload)];
        header.metadata_size = metadata.iter().map(|b| b.wire_size()).sum();

        Ok(ContainerFile {
            header,
            metadata,
            payload,
        })
    }

    /// Builds a six-face cubemap container. The face order metadata block
    /// is always emitted, in canonical order; images are keyed by their
    /// mipmap level and cube face tags.
    pub fn from_cube_images(images: &[ImageBuffer]) -> Result<Self, ContainerError> {
        if images.is_empty() {
            return Err(ContainerError::InvalidImageSet("no images".into()));
        }

        let mut ordered: Vec<&ImageBuffer> = images.iter().collect();
        ordered.sort_by_key(|img| {
            (
                img.mipmap_level().unwrap_or(0),
                img.cube_face().map(|f| f.index()).unwrap_or(0),
            )
        });

        let mip_count = ordered.len() / 6;
        if mip_count * 6 != ordered.len() {
            return Err(ContainerError::InvalidImageSet(format!(
                "cubemap needs a multiple of 6 images, got {}",
                ordered.len()
            )));
        }
        for (i, img) in ordered.iter().enumerate() {
            let face = img.cube_face().map(|f| f.index());
            if face != Some(i as u32 % 6) {
                return Err(ContainerError::InvalidImageSet(format!(
                    "face tags out of order at image {i}"
                )));
            }
        }

        let base = ordered[0];
        let mut header =
            ContainerHeader::new(base.format(), base.width(), base.height(), mip_count as u32);
        header.num_faces = 6;

        let payload = concat_payload(&ordered, &header)?;
        let metadata = vec![
            MetadataBlock::canonical_cube_order(),
            MetadataBlock::payload_crc(&payload),
        ];
        header.metadata_size = metadata.iter().map(|b| b.wire_size()).sum();

        Ok(ContainerFile {
            header,
            metadata,
            payload,
        })
    }

    /// Serializes header, metadata blocks and payload.
    pub fn write(&self, writer: &mut impl Write) -> Result<(), ContainerError> {
        debug_assert_eq!(
            self.header.metadata_size,
            self.metadata.iter().map(|b| b.wire_size()).sum::<u32>()
        );
        self.header.write(writer)?;
        for block in &self.metadata {
            block.write(writer)?;
        }
        writer.write_all(&self.payload)?;
        Ok(())
    }
}

fn concat_payload(
    ordered: &[&ImageBuffer],
    header: &ContainerHeader,
) -> Result<Vec<u8>, ContainerError> {
    let format = header.format()?;
    let faces = header.num_faces.max(1) as usize;
    let mut payload = Vec::with_capacity(payload_len(format, header));

    for (i, img) in ordered.iter().enumerate() {
        let mip = (i / faces) as u32;
        let width = (header.width >> mip).max(1);
        let height = (header.height >> mip).max(1);

        if img.format() != format {
            return Err(ContainerError::InvalidImageSet(format!(
                "image {i} has format {}, set is {}",
                img.format().name(),
                format.name()
            )));
        }
        if img.width() != width || img.height() != height {
            return Err(ContainerError::InvalidImageSet(format!(
                "image {i} is {}x{}, expected {width}x{height} for mip {mip}",
                img.width(),
                img.height()
            )));
        }
        debug_assert_eq!(
            img.data().len(),
            format::data_size(format, width, height)
        );
        payload.extend_from_slice(img.data());
    }

    Ok(payload)
}
