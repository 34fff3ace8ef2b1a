//! Codec selection and post-decode normalization.

use super::{CodecError, ContainerCodec, ImageCodec, ImageInfo, JpegCodec, LoadingParams, PngCodec, WebpCodec};
use crate::format::{PixelFormat, PixelFormatRegistry};
use crate::image::{convert_to_rgba8888, ImageBuffer};
use std::path::Path;
use tracing::debug;

/// Routes load and save calls to the right [`ImageCodec`] and converts
/// decoded images the hardware cannot sample into plain RGBA8888.
///
/// Holds a snapshot of the [`PixelFormatRegistry`] taken at construction.
pub struct CodecDispatcher {
    codecs: Vec<Box<dyn ImageCodec>>,
    registry: PixelFormatRegistry,
}

impl CodecDispatcher {
    /// Builds a dispatcher with the standard codec set. Registration order
    /// is the content-sniffing order.
    pub fn new(registry: PixelFormatRegistry) -> Self {
        CodecDispatcher {
            codecs: vec![
                Box::new(PngCodec),
                Box::new(ContainerCodec),
                Box::new(JpegCodec),
                Box::new(WebpCodec),
            ],
            registry,
        }
    }

    fn codec_for_extension(&self, path: &Path) -> Option<&dyn ImageCodec> {
        self.codecs
            .iter()
            .find(|c| c.matches_extension(path))
            .map(|c| c.as_ref())
    }

    fn codec_for_content(&self, bytes: &[u8]) -> Option<&dyn ImageCodec> {
        self.codecs
            .iter()
            .find(|c| c.matches_content(bytes))
            .map(|c| c.as_ref())
    }

    /// Extension match wins and is final; content sniffing only runs when no
    /// codec claims the extension.
    fn select(&self, path: &Path, bytes: &[u8]) -> Result<&dyn ImageCodec, CodecError> {
        if let Some(codec) = self.codec_for_extension(path) {
            return Ok(codec);
        }
        self.codec_for_content(bytes)
            .ok_or_else(|| CodecError::UnrecognizedFormat(path.display().to_string()))
    }

    /// Loads and normalizes the image set stored at `path`.
    pub fn load_from_path(
        &self,
        path: &Path,
        params: &LoadingParams,
    ) -> Result<Vec<ImageBuffer>, CodecError> {
        let bytes = std::fs::read(path)?;
        let codec = self.select(path, &bytes)?;
        debug!(codec = codec.name(), path = %path.display(), "decoding image file");
        let images = codec.decode(&bytes, params)?;
        self.normalize(images)
    }

    /// Loads from an in-memory buffer; selection is by content only.
    pub fn load_from_bytes(
        &self,
        bytes: &[u8],
        params: &LoadingParams,
    ) -> Result<Vec<ImageBuffer>, CodecError> {
        let codec = self
            .codec_for_content(bytes)
            .ok_or_else(|| CodecError::UnrecognizedFormat("<memory>".into()))?;
        let images = codec.decode(bytes, params)?;
        self.normalize(images)
    }

    /// Encodes `images` to `path`; the codec is chosen by extension alone.
    pub fn save(
        &self,
        path: &Path,
        images: &[ImageBuffer],
        target_format: PixelFormat,
        quality: u8,
    ) -> Result<(), CodecError> {
        let codec = self
            .codec_for_extension(path)
            .ok_or_else(|| CodecError::UnrecognizedFormat(path.display().to_string()))?;
        debug!(codec = codec.name(), path = %path.display(), "encoding image file");
        codec.encode(path, images, target_format, quality)
    }

    /// Dimensions and format of `path` without a full decode.
    pub fn probe(&self, path: &Path) -> Result<ImageInfo, CodecError> {
        let bytes = std::fs::read(path)?;
        let codec = self.select(path, &bytes)?;
        codec.probe(&bytes)
    }

    /// Rewrites each image the hardware cannot sample into RGBA8888.
    /// Hardware-supported formats pass through untouched.
    fn normalize(&self, images: Vec<ImageBuffer>) -> Result<Vec<ImageBuffer>, CodecError> {
        images
            .into_iter()
            .map(|img| {
                if self.registry.is_hardware_supported(img.format()) {
                    Ok(img)
                } else {
                    self.soften(img)
                }
            })
            .collect()
    }

    fn soften(&self, img: ImageBuffer) -> Result<ImageBuffer, CodecError> {
        let format = img.format();
        debug!(format = format.name(), "software-decoding unsupported format");

        if !format.is_block_compressed() {
            return convert_to_rgba8888(&img).map_err(CodecError::from);
        }

        let dds_format = match format {
            PixelFormat::Dxt1 | PixelFormat::Dxt1a => image_dds::ImageFormat::BC1RgbaUnorm,
            PixelFormat::Dxt3 => image_dds::ImageFormat::BC2RgbaUnorm,
            PixelFormat::Dxt5 | PixelFormat::Dxt5nm => image_dds::ImageFormat::BC3RgbaUnorm,
            other => {
                return Err(CodecError::DecodeFail(format!(
                    "no software decoder for {}",
                    other.name()
                )))
            }
        };

        let surface = image_dds::Surface {
            width: img.width(),
            height: img.height(),
            depth: 1,
            layers: 1,
            mipmaps: 1,
            image_format: dds_format,
            data: img.data(),
        };
        let decoded = surface
            .decode_rgba8()
            .map_err(|e| CodecError::DecodeFail(e.to_string()))?;

        let mut out = ImageBuffer::from_data(
            img.width(),
            img.height(),
            PixelFormat::Rgba8888,
            decoded.data,
        )
        .map_err(|e| CodecError::DecodeFail(e.to_string()))?;
        out.set_mipmap_level(img.mipmap_level());
        out.set_cube_face(img.cube_face());
        Ok(out)
    }
}
