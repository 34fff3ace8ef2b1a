//! The pink/gray checkerboard substituted for textures that fail to load.

use crate::format::PixelFormat;
use crate::image::ImageBuffer;
use std::sync::OnceLock;

const PLACEHOLDER_SIDE: u32 = 16;
const PINK: u32 = 0xFFFF_00FF;
const GRAY: u32 = 0xFFFF_FF00;

static PLACEHOLDER: OnceLock<ImageBuffer> = OnceLock::new();

/// A deterministic 16x16 RGBA8888 checkerboard, built once per process.
pub fn placeholder_image() -> ImageBuffer {
    PLACEHOLDER.get_or_init(make_checkerboard).clone()
}

fn make_checkerboard() -> ImageBuffer {
    let mut image = ImageBuffer::new(PLACEHOLDER_SIDE, PLACEHOLDER_SIDE, PixelFormat::Rgba8888)
        .unwrap_or_else(|_| unreachable!("fixed placeholder dimensions are valid"));
    image.set_mipmap_level(Some(0));

    // Texels are written sequentially while the outer loop walks columns,
    // with the phase flipped once per texel and once more per column. The
    // on-screen result is the classic 1x1 checkerboard.
    let data = image.data_mut();
    let mut offset = 0;
    let mut pink = false;
    for _ in 0..PLACEHOLDER_SIDE {
        pink = !pink;
        for _ in 0..PLACEHOLDER_SIDE {
            let texel = if pink { PINK } else { GRAY };
            data[offset..offset + 4].copy_from_slice(&texel.to_le_bytes());
            offset += 4;
            pink = !pink;
        }
    }
    image
}
