//! Shared glue between the `image` crate's raster types and [`ImageBuffer`].

use super::{CodecError, LoadingParams};
use crate::format::PixelFormat;
use crate::image::{convert_to_rgba8888, ImageBuffer};
use image::{ColorType, DynamicImage};

/// Maps a decoded color type to the pipeline pixel format it will carry.
pub(super) fn format_for_color(color: ColorType) -> PixelFormat {
    match color {
        ColorType::L8 => PixelFormat::A8,
        ColorType::L16 => PixelFormat::A16,
        ColorType::Rgb8 => PixelFormat::Rgb888,
        // Everything else is widened to canonical RGBA on decode.
        _ => PixelFormat::Rgba8888,
    }
}

/// Converts a decoded raster image into an [`ImageBuffer`], tagging it with
/// the caller's first mip index.
pub(super) fn buffer_from_dynamic(
    decoded: DynamicImage,
    params: &LoadingParams,
) -> Result<ImageBuffer, CodecError> {
    let width = decoded.width();
    let height = decoded.height();

    let (format, data) = match decoded {
        DynamicImage::ImageLuma8(img) => (PixelFormat::A8, img.into_raw()),
        DynamicImage::ImageLuma16(img) => {
            // Little-endian texels, matching the A16 wire layout.
            let mut data = Vec::with_capacity(img.len() * 2);
            for value in img.into_raw() {
                data.extend_from_slice(&value.to_le_bytes());
            }
            (PixelFormat::A16, data)
        }
        DynamicImage::ImageRgb8(img) => (PixelFormat::Rgb888, img.into_raw()),
        DynamicImage::ImageRgba8(img) => (PixelFormat::Rgba8888, img.into_raw()),
        other => (PixelFormat::Rgba8888, other.to_rgba8().into_raw()),
    };

    let mut buffer = ImageBuffer::from_data(width, height, format, data)
        .map_err(|e| CodecError::DecodeFail(e.to_string()))?;
    buffer.set_mipmap_level(Some(params.first_mipmap_index));
    Ok(buffer)
}

/// Flattens an [`ImageBuffer`] into tightly packed RGBA8888 bytes for an
/// encoder. Block-compressed inputs cannot be rasterized here.
pub(super) fn rgba_bytes(image: &ImageBuffer) -> Result<(u32, u32, Vec<u8>), CodecError> {
    if image.format().is_block_compressed() {
        return Err(CodecError::EncodeFail(format!(
            "cannot rasterize block-compressed format {}",
            image.format().name()
        )));
    }
    let rgba = convert_to_rgba8888(image).map_err(|e| CodecError::EncodeFail(e.to_string()))?;
    Ok((rgba.width(), rgba.height(), rgba.into_data()))
}

/// The first image of a set, the one raster encoders write.
pub(super) fn base_image<'a>(images: &'a [ImageBuffer]) -> Result<&'a ImageBuffer, CodecError> {
    images
        .first()
        .ok_or_else(|| CodecError::EncodeFail("empty image set".into()))
}
