//! Per-format pixel unpack/pack and canonical RGBA conversion.
//!
//! These are the byte layouts the container format and the transform engine
//! agree on. All multi-byte texels are little-endian:
//!
//! - `RGBA8888`: bytes `r, g, b, a`
//! - `RGB888`:   bytes `r, g, b`
//! - `RGB565`:   u16, r in bits 11-15, g in 5-10, b in 0-4
//! - `RGBA4444`: u16, r in bits 12-15, g in 8-11, b in 4-7, a in 0-3
//! - `RGBA5551`: u16, r in bits 11-15, g in 6-10, b in 1-5, a in bit 0
//! - `A8`:       one byte, replicated to gray on expansion, alpha opaque
//! - `A16`:      u16, high byte used on expansion
//!
//! Narrow channels expand to 8 bits by bit replication so that full-scale
//! values map to 255 exactly.

use super::{ImageBuffer, TransformError};
use crate::format::PixelFormat;

fn expand5(v: u16) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}

fn expand6(v: u16) -> u8 {
    ((v << 2) | (v >> 4)) as u8
}

fn expand4(v: u16) -> u8 {
    ((v << 4) | v) as u8
}

/// Reads one texel as 8-bit RGBA.
pub(crate) fn unpack_pixel(format: PixelFormat, src: &[u8]) -> [u8; 4] {
    match format {
        PixelFormat::Rgba8888 => [src[0], src[1], src[2], src[3]],
        PixelFormat::Rgb888 => [src[0], src[1], src[2], 255],
        PixelFormat::Rgb565 => {
            let v = u16::from_le_bytes([src[0], src[1]]);
            [expand5(v >> 11), expand6((v >> 5) & 0x3F), expand5(v & 0x1F), 255]
        }
        PixelFormat::Rgba4444 => {
            let v = u16::from_le_bytes([src[0], src[1]]);
            [
                expand4(v >> 12),
                expand4((v >> 8) & 0xF),
                expand4((v >> 4) & 0xF),
                expand4(v & 0xF),
            ]
        }
        PixelFormat::Rgba5551 => {
            let v = u16::from_le_bytes([src[0], src[1]]);
            [
                expand5(v >> 11),
                expand5((v >> 6) & 0x1F),
                expand5((v >> 1) & 0x1F),
                if v & 1 != 0 { 255 } else { 0 },
            ]
        }
        PixelFormat::A8 => [src[0], src[0], src[0], 255],
        PixelFormat::A16 => {
            let v = u16::from_le_bytes([src[0], src[1]]);
            let hi = (v >> 8) as u8;
            [hi, hi, hi, 255]
        }
        _ => unreachable!("unpack_pixel on block-compressed format"),
    }
}

/// Writes one 8-bit RGBA texel back in `format`'s layout.
pub(crate) fn pack_pixel(format: PixelFormat, rgba: [u8; 4], dst: &mut [u8]) {
    let [r, g, b, a] = rgba;
    match format {
        PixelFormat::Rgba8888 => dst[..4].copy_from_slice(&rgba),
        PixelFormat::Rgb888 => dst[..3].copy_from_slice(&[r, g, b]),
        PixelFormat::Rgb565 => {
            let v = ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3);
            dst[..2].copy_from_slice(&v.to_le_bytes());
        }
        PixelFormat::Rgba4444 => {
            let v = ((r as u16 >> 4) << 12)
                | ((g as u16 >> 4) << 8)
                | ((b as u16 >> 4) << 4)
                | (a as u16 >> 4);
            dst[..2].copy_from_slice(&v.to_le_bytes());
        }
        PixelFormat::Rgba5551 => {
            let v = ((r as u16 >> 3) << 11)
                | ((g as u16 >> 3) << 6)
                | ((b as u16 >> 3) << 1)
                | (a as u16 >> 7);
            dst[..2].copy_from_slice(&v.to_le_bytes());
        }
        PixelFormat::A8 => dst[0] = r,
        PixelFormat::A16 => {
            let v = ((r as u16) << 8) | r as u16;
            dst[..2].copy_from_slice(&v.to_le_bytes());
        }
        _ => unreachable!("pack_pixel on block-compressed format"),
    }
}

/// Converts an uncompressed image to canonical RGBA8888, preserving the
/// mipmap level and cube face tags. Block-compressed inputs go through a
/// format-specific decompressor elsewhere, not through this path.
pub fn convert_to_rgba8888(src: &ImageBuffer) -> Result<ImageBuffer, TransformError> {
    if src.format().is_block_compressed() {
        return Err(TransformError::UnsupportedTransform(src.format()));
    }
    if src.format() == PixelFormat::Rgba8888 {
        return Ok(src.clone());
    }

    let pixel_size = (src.format().bits_per_pixel() / 8) as usize;
    let count = (src.width() * src.height()) as usize;
    let mut data = Vec::with_capacity(count * 4);
    for i in 0..count {
        let rgba = unpack_pixel(src.format(), &src.data()[i * pixel_size..]);
        data.extend_from_slice(&rgba);
    }

    let mut out = ImageBuffer::from_data(src.width(), src.height(), PixelFormat::Rgba8888, data)?;
    out.set_mipmap_level(src.mipmap_level());
    out.set_cube_face(src.cube_face());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_full_scale_hits_255() {
        assert_eq!(expand5(0x1F), 255);
        assert_eq!(expand6(0x3F), 255);
        assert_eq!(expand4(0xF), 255);
        assert_eq!(expand5(0), 0);
    }

    #[test]
    fn test_rgb565_round_trip() {
        let mut buf = [0u8; 2];
        pack_pixel(PixelFormat::Rgb565, [255, 132, 0, 255], &mut buf);
        let rgba = unpack_pixel(PixelFormat::Rgb565, &buf);
        assert_eq!(rgba[0], 255);
        assert_eq!(rgba[3], 255);
        // Green survives to within 6-bit precision.
        assert!((rgba[1] as i16 - 132).unsigned_abs() <= 4);
    }

    #[test]
    fn test_rgba5551_alpha_is_one_bit() {
        let mut buf = [0u8; 2];
        pack_pixel(PixelFormat::Rgba5551, [0, 0, 0, 200], &mut buf);
        assert_eq!(unpack_pixel(PixelFormat::Rgba5551, &buf)[3], 255);
        pack_pixel(PixelFormat::Rgba5551, [0, 0, 0, 100], &mut buf);
        assert_eq!(unpack_pixel(PixelFormat::Rgba5551, &buf)[3], 0);
    }

    #[test]
    fn test_convert_rgb888_to_rgba8888() {
        let src =
            ImageBuffer::from_data(2, 1, PixelFormat::Rgb888, vec![10, 20, 30, 40, 50, 60])
                .unwrap();
        let out = convert_to_rgba8888(&src).unwrap();
        assert_eq!(out.format(), PixelFormat::Rgba8888);
        assert_eq!(out.data(), &[10, 20, 30, 255, 40, 50, 60, 255]);
    }

    #[test]
    fn test_convert_a8_expands_to_gray() {
        let src = ImageBuffer::from_data(1, 1, PixelFormat::A8, vec![77]).unwrap();
        let out = convert_to_rgba8888(&src).unwrap();
        assert_eq!(out.data(), &[77, 77, 77, 255]);
    }

    #[test]
    fn test_convert_preserves_tags() {
        use crate::image::CubeFace;
        let mut src = ImageBuffer::new(2, 2, PixelFormat::Rgb565).unwrap();
        src.set_mipmap_level(Some(3));
        src.set_cube_face(Some(CubeFace::NegativeY));
        let out = convert_to_rgba8888(&src).unwrap();
        assert_eq!(out.mipmap_level(), Some(3));
        assert_eq!(out.cube_face(), Some(CubeFace::NegativeY));
    }

    #[test]
    fn test_convert_block_format_rejected() {
        let src = ImageBuffer::new(4, 4, PixelFormat::Dxt5).unwrap();
        assert!(matches!(
            convert_to_rgba8888(&src),
            Err(TransformError::UnsupportedTransform(PixelFormat::Dxt5))
        ));
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        const PACKED_FORMATS: [PixelFormat; 3] = [
            PixelFormat::Rgb565,
            PixelFormat::Rgba4444,
            PixelFormat::Rgba5551,
        ];

        proptest! {
            #[test]
            fn test_pack_quantization_is_idempotent(
                r in 0u8..=255, g in 0u8..=255, b in 0u8..=255, a in 0u8..=255
            ) {
                // Packing, expanding back to 8 bits, and packing again must
                // land on the same wire bytes.
                for format in PACKED_FORMATS {
                    let mut first = [0u8; 2];
                    pack_pixel(format, [r, g, b, a], &mut first);
                    let rgba = unpack_pixel(format, &first);
                    let mut second = [0u8; 2];
                    pack_pixel(format, rgba, &mut second);
                    prop_assert_eq!(first, second, "format {}", format.name());
                }
            }

            #[test]
            fn test_rgb565_expansion_error_is_bounded(
                r in 0u8..=255, g in 0u8..=255, b in 0u8..=255
            ) {
                let mut buf = [0u8; 2];
                pack_pixel(PixelFormat::Rgb565, [r, g, b, 255], &mut buf);
                let rgba = unpack_pixel(PixelFormat::Rgb565, &buf);
                prop_assert!((rgba[0] as i16 - r as i16).unsigned_abs() <= 8);
                prop_assert!((rgba[1] as i16 - g as i16).unsigned_abs() <= 4);
                prop_assert!((rgba[2] as i16 - b as i16).unsigned_abs() <= 8);
                prop_assert_eq!(rgba[3], 255);
            }
        }
    }
}
