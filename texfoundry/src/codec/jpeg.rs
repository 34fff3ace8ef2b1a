//! JPEG codec.

use super::raster::{base_image, buffer_from_dynamic, format_for_color, rgba_bytes};
use super::{CodecError, ImageCodec, ImageInfo, LoadingParams};
use crate::format::PixelFormat;
use crate::image::ImageBuffer;
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{DynamicImage, ExtendedColorType, ImageDecoder};
use std::io::Cursor;
use std::path::Path;

pub struct JpegCodec;

impl ImageCodec for JpegCodec {
    fn name(&self) -> &'static str {
        "jpeg"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["jpg", "jpeg"]
    }

    fn matches_content(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(&[0xFF, 0xD8, 0xFF])
    }

    fn decode(
        &self,
        bytes: &[u8],
        params: &LoadingParams,
    ) -> Result<Vec<ImageBuffer>, CodecError> {
        let decoder = JpegDecoder::new(Cursor::new(bytes))?;
        let decoded = DynamicImage::from_decoder(decoder)?;
        Ok(vec![buffer_from_dynamic(decoded, params)?])
    }

    fn encode(
        &self,
        path: &Path,
        images: &[ImageBuffer],
        _target_format: PixelFormat,
        quality: u8,
    ) -> Result<(), CodecError> {
        let base = base_image(images)?;
        let (width, height, rgba) = rgba_bytes(base)?;

        // JPEG carries no alpha channel.
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for texel in rgba.chunks_exact(4) {
            rgb.extend_from_slice(&texel[..3]);
        }

        let mut file = std::fs::File::create(path)?;
        JpegEncoder::new_with_quality(&mut file, quality.clamp(1, 100))
            .encode(&rgb, width, height, ExtendedColorType::Rgb8)
            .map_err(|e| CodecError::EncodeFail(e.to_string()))
    }

    fn probe(&self, bytes: &[u8]) -> Result<ImageInfo, CodecError> {
        let decoder = JpegDecoder::new(Cursor::new(bytes))?;
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
