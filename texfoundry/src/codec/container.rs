//! Codec wrapper around the compressed-texture container format.

use super::{CodecError, ImageCodec, ImageInfo, LoadingParams};
use crate::container::{ContainerFile, ContainerHeader, CONTAINER_MAGIC};
use crate::format::PixelFormat;
use crate::image::ImageBuffer;
use std::io::Cursor;
use std::path::Path;

pub struct ContainerCodec;

impl ContainerCodec {
    /// Clamps the requested base mip so the chain keeps at least one level
    /// and, for block-compressed formats, never selects a level below the
    /// minimal usable dimensions.
    fn effective_base_mip(header: &ContainerHeader, format: PixelFormat, params: &LoadingParams) -> u32 {
        let mut base = params.base_mipmap.min(header.mip_count.saturating_sub(1));
        if format.is_block_compressed() {
            while base > 0
                && ((header.width >> base) < params.minimal_width
                    || (header.height >> base) < params.minimal_height)
            {
                base -= 1;
            }
        }
        base
    }
}

impl ImageCodec for ContainerCodec {
    fn name(&self) -> &'static str {
        "container"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["pvr"]
    }

    fn matches_content(&self, bytes: &[u8]) -> bool {
        bytes.len() >= 4 && bytes[..4] == CONTAINER_MAGIC.to_le_bytes()
    }

    fn decode(
        &self,
        bytes: &[u8],
        params: &LoadingParams,
    ) -> Result<Vec<ImageBuffer>, CodecError> {
        let file = ContainerFile::read(&mut Cursor::new(bytes))?;
        let format = file.header.format()?;
        let base = Self::effective_base_mip(&file.header, format, params);

        let mut images = Vec::new();
        for segment in file.payload_segments()? {
            if segment.mip < base {
                continue;
            }
            let mut img = ImageBuffer::from_data(
                segment.width,
                segment.height,
                format,
                file.payload[segment.range.clone()].to_vec(),
            )
            .map_err(|e| CodecError::DecodeFail(e.to_string()))?;
            img.set_mipmap_level(Some(params.first_mipmap_index + segment.mip - base));
            img.set_cube_face(segment.face);
            images.push(img);
        }

        Ok(images)
    }

    fn encode(
        &self,
        path: &Path,
        images: &[ImageBuffer],
        target_format: PixelFormat,
        _quality: u8,
    ) -> Result<(), CodecError> {
        if images.iter().any(|img| img.format() != target_format) {
            // No in-process compressor: the set must already be in the
            // target format.
            return Err(CodecError::EncodeFail(format!(
                "image set is not in target format {}",
                target_format.name()
            )));
        }

        let is_cube = images.iter().any(|img| img.cube_face().is_some());
        let file = if is_cube {
            ContainerFile::from_cube_images(images)?
        } else {
            ContainerFile::from_images(images)?
        };

        let mut out = std::fs::File::create(path)?;
        file.write(&mut out)?;
        Ok(())
    }

    fn probe(&self, bytes: &[u8]) -> Result<ImageInfo, CodecError> {
        let header = ContainerHeader::read(&mut Cursor::new(bytes))?;
        Ok(ImageInfo {
            width: header.width,
            height: header.height,
            format: header.format()?,
            mip_count: header.mip_count.max(1),
            face_count: header.num_faces.max(1),
        })
    }
}
