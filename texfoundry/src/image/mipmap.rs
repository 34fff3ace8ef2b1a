//! Lazy mipmap pyramid generation.

use super::convert::{pack_pixel, unpack_pixel};
use super::{ImageBuffer, TransformError};

impl ImageBuffer {
    /// Consumes the image and returns the full mipmap pyramid as a lazy,
    /// finite, non-restartable sequence.
    ///
    /// The first item is the source itself tagged as mip 0; each following
    /// item halves both dimensions (floor, minimum 1) with a 2x2 box filter
    /// until a 1x1 level has been yielded. Odd dimensions round the new size
    /// down. With `is_normal_map`, texels are renormalized to unit length
    /// before mip 0 is yielded and again after every downsample.
    ///
    /// Only uncompressed formats can be filtered.
    pub fn generate_mipmap_chain(
        mut self,
        is_normal_map: bool,
    ) -> Result<MipmapChain, TransformError> {
        if self.format().is_block_compressed() {
            return Err(TransformError::UnsupportedTransform(self.format()));
        }
        self.set_mipmap_level(Some(0));
        if is_normal_map {
            renormalize(&mut self);
        }
        Ok(MipmapChain {
            next: Some(self),
            is_normal_map,
        })
    }
}

/// Iterator over a mipmap pyramid, smallest level last. See
/// [`ImageBuffer::generate_mipmap_chain`].
#[derive(Debug)]
pub struct MipmapChain {
    next: Option<ImageBuffer>,
    is_normal_map: bool,
}

impl Iterator for MipmapChain {
    type Item = ImageBuffer;

    fn next(&mut self) -> Option<ImageBuffer> {
        let current = self.next.take()?;
        if current.width() > 1 || current.height() > 1 {
            let mut half = downsample(&current);
            if self.is_normal_map {
                renormalize(&mut half);
            }
            self.next = Some(half);
        }
        Some(current)
    }
}

/// 2x2 box filter halving. Edge texels of odd dimensions sample their
/// clamped neighbor twice.
fn downsample(src: &ImageBuffer) -> ImageBuffer {
    let new_width = (src.width() >> 1).max(1);
    let new_height = (src.height() >> 1).max(1);
    let format = src.format();
    let pixel_size = (format.bits_per_pixel() / 8) as usize;

    let mut out = ImageBuffer::new(new_width, new_height, format)
        .expect("halved dimensions stay valid");

    let sample = |x: u32, y: u32| -> [u8; 4] {
        let x = x.min(src.width() - 1);
        let y = y.min(src.height() - 1);
        let offset = ((y * src.width() + x) as usize) * pixel_size;
        unpack_pixel(format, &src.data()[offset..])
    };

    for y in 0..new_height {
        for x in 0..new_width {
            let mut sum = [0u16; 4];
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                let texel = sample(2 * x + dx, 2 * y + dy);
                for c in 0..4 {
                    sum[c] += texel[c] as u16;
                }
            }
            let avg = sum.map(|s| ((s + 2) / 4) as u8);
            let offset = ((y * new_width + x) as usize) * pixel_size;
            pack_pixel(format, avg, &mut out.data_mut()[offset..]);
        }
    }

    out.set_cube_face(src.cube_face());
    out.set_mipmap_level(src.mipmap_level().map(|l| l + 1));
    out
}

/// Rescales each vector-valued texel to unit length. RGB encodes the
/// vector as `v = c / 127.5 - 1`; alpha is left untouched. Degenerate
/// zero-length texels become the up vector.
fn renormalize(img: &mut ImageBuffer) {
    let format = img.format();
    let pixel_size = (format.bits_per_pixel() / 8) as usize;
    let count = (img.width() * img.height()) as usize;

    for i in 0..count {
        let offset = i * pixel_size;
        let texel = unpack_pixel(format, &img.data()[offset..]);
        let v = [
            texel[0] as f32 / 127.5 - 1.0,
            texel[1] as f32 / 127.5 - 1.0,
            texel[2] as f32 / 127.5 - 1.0,
        ];
        let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        let n = if len > 0.0 {
            [v[0] / len, v[1] / len, v[2] / len]
        } else {
            [0.0, 0.0, 1.0]
        };
        let repacked = [
            (((n[0] + 1.0) * 127.5).round().clamp(0.0, 255.0)) as u8,
            (((n[1] + 1.0) * 127.5).round().clamp(0.0, 255.0)) as u8,
            (((n[2] + 1.0) * 127.5).round().clamp(0.0, 255.0)) as u8,
            texel[3],
        ];
        pack_pixel(format, repacked, &mut img.data_mut()[offset..]);
    }
}
