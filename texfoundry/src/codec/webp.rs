//! WebP codec. Encoding uses the `image` crate's lossless encoder; the
//! quality parameter is accepted for interface parity and ignored.

use super::raster::{base_image, buffer_from_dynamic, format_for_color, rgba_bytes};
use super::{CodecError, ImageCodec, ImageInfo, LoadingParams};
use crate::format::PixelFormat;
use crate::image::ImageBuffer;
use image::codecs::webp::{WebPDecoder, WebPEncoder};
use image::{DynamicImage, ExtendedColorType, ImageDecoder};
use std::io::Cursor;
use std::path::Path;

pub struct WebpCodec;

impl ImageCodec for WebpCodec {
    fn name(&self) -> &'static str {
        "webp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["webp"]
    }

    fn matches_content(&self, bytes: &[u8]) -> bool {
        bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
    }

    fn decode(
        &self,
        bytes: &[u8],
        params: &LoadingParams,
    ) -> Result<Vec<ImageBuffer>, CodecError> {
        let decoder = WebPDecoder::new(Cursor::new(bytes))?;
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
        WebPEncoder::new_lossless(file)
            .encode(&data, width, height, ExtendedColorType::Rgba8)
            .map_err(|e| CodecError::EncodeFail(e.to_string()))
    }

    fn probe(&self, bytes: &[u8]) -> Result<ImageInfo, CodecError> {
        let decoder = WebPDecoder::new(Cursor::new(bytes))?;
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
