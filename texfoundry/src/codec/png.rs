//! PNG codec.

use super::raster::{base_image, buffer_from_dynamic, format_for_color, rgba_bytes};
use super::{CodecError, ImageCodec, ImageInfo, LoadingParams};
use crate::format::PixelFormat;
use crate::image::ImageBuffer;
use image::codecs::png::{PngDecoder, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder};
use std::io::Cursor;
use std::path::Path;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn name(&self) -> &'static str {
        "png"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["png"]
    }

    fn matches_content(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(&PNG_SIGNATURE)
    }

    fn decode(
        &self,
        bytes: &[u8],
        params: &LoadingParams,
    ) -> Result<Vec<ImageBuffer>, CodecError> {
        let decoder = PngDecoder::new(Cursor::new(bytes))?;
        let decoded = DynamicImage::from_decoder(decoder)?;
        Ok(vec![buffer_from_dynamic(decoded, params)?])
    }

    fn encode(
        &self,
        path: &Path,
        images: &[ImageBuffer],
        _target_format: PixelFormat,
        _quality: u8,
    ) -> Result<(), CodecError> {
        let base = base_image(images)?;
        let (width, height, data) = rgba_bytes(base)?;
        let file = std::fs::File::create(path)?;
        PngEncoder::new(file)
            .write_image(&data, width, height, ExtendedColorType::Rgba8)
            .map_err(|e| CodecError::EncodeFail(e.to_string()))
    }

    fn probe(&self, bytes: &[u8]) -> Result<ImageInfo, CodecError> {
        let decoder = PngDecoder::new(Cursor::new(bytes))?;
        let (width, height) = decoder.dimensions();
        Ok(ImageInfo {
            width,
            height,
            format: format_for_color(decoder.color_type()),
            mip_count: 1,
            face_count: 1,
        })
    }
}
