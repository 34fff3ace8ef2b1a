//! Pixel transforms: resampling, canvas padding, region copies, flips and
//! quarter rotations.
//!
//! All operations here are defined for uncompressed formats only; a
//! block-compressed buffer signals [`TransformError::UnsupportedTransform`].
//! Region operations clip to the intersection of the addressed rectangles
//! instead of failing, with one exception: mismatched pixel formats are a
//! caller defect and abort the copy.

use super::{ImageBuffer, TransformError};

impl ImageBuffer {
    fn require_uncompressed(&self) -> Result<usize, TransformError> {
        let pixel_size = self.pixel_size();
        if self.format().is_block_compressed() || pixel_size == 0 {
            return Err(TransformError::UnsupportedTransform(self.format()));
        }
        Ok(pixel_size)
    }

    /// Nearest-neighbor resample to `new_width` x `new_height`.
    ///
    /// Each destination pixel samples `round(dst * (old / new))`, clamped to
    /// the source bounds. No filtering.
    pub fn resize_image(&mut self, new_width: u32, new_height: u32) -> Result<(), TransformError> {
        let pixel_size = self.require_uncompressed()?;
        if new_width == 0 || new_height == 0 {
            return Err(TransformError::InvalidDimensions {
                width: new_width,
                height: new_height,
            });
        }

        let kx = self.width() as f32 / new_width as f32;
        let ky = self.height() as f32 / new_height as f32;
        let mut new_data = vec![0u8; new_width as usize * new_height as usize * pixel_size];

        for y in 0..new_height as usize {
            let src_y = (((y as f32) * ky + 0.5) as usize).min(self.height() as usize - 1);
            for x in 0..new_width as usize {
                let src_x = (((x as f32) * kx + 0.5) as usize).min(self.width() as usize - 1);
                let src = (src_y * self.width() as usize + src_x) * pixel_size;
                let dst = (y * new_width as usize + x) * pixel_size;
                new_data[dst..dst + pixel_size]
                    .copy_from_slice(&self.data()[src..src + pixel_size]);
            }
        }

        self.replace_data(new_width, new_height, new_data);
        Ok(())
    }

    /// Grows or crops the canvas without resampling. Existing pixels stay
    /// anchored at the origin corner; new area is zero-filled.
    pub fn resize_canvas(&mut self, new_width: u32, new_height: u32) -> Result<(), TransformError> {
        let pixel_size = self.require_uncompressed()?;
        if new_width == 0 || new_height == 0 {
            return Err(TransformError::InvalidDimensions {
                width: new_width,
                height: new_height,
            });
        }

        let mut new_data = vec![0u8; new_width as usize * new_height as usize * pixel_size];
        let copy_width = self.width().min(new_width) as usize * pixel_size;
        let copy_rows = self.height().min(new_height) as usize;
        let old_stride = self.width() as usize * pixel_size;
        let new_stride = new_width as usize * pixel_size;

        for row in 0..copy_rows {
            new_data[row * new_stride..row * new_stride + copy_width]
                .copy_from_slice(&self.data()[row * old_stride..row * old_stride + copy_width]);
        }

        self.replace_data(new_width, new_height, new_data);
        Ok(())
    }

    /// Canvas-pads the image to `max(width, height)` square.
    pub fn resize_to_square(&mut self) -> Result<(), TransformError> {
        let side = self.width().max(self.height());
        self.resize_canvas(side, side)
    }

    /// Canvas-pads each dimension up to the next power of two. No-op when
    /// both dimensions already are.
    pub fn ensure_power_of_two(&mut self) -> Result<(), TransformError> {
        let pot_width = self.width().next_power_of_two();
        let pot_height = self.height().next_power_of_two();
        if pot_width == self.width() && pot_height == self.height() {
            return Ok(());
        }
        self.resize_canvas(pot_width, pot_height)
    }

    /// Copies a rectangle out into a new image, clipping the rectangle to
    /// the source bounds. A rectangle entirely outside the image is a
    /// caller defect.
    pub fn copy_region(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<ImageBuffer, TransformError> {
        let pixel_size = self.require_uncompressed()?;
        if x >= self.width() || y >= self.height() || width == 0 || height == 0 {
            return Err(TransformError::InvalidRegion { x, y, width, height });
        }

        let clipped_width = width.min(self.width() - x);
        let clipped_height = height.min(self.height() - y);

        let mut out = ImageBuffer::new(clipped_width, clipped_height, self.format())?;
        let src_stride = self.width() as usize * pixel_size;
        let dst_stride = clipped_width as usize * pixel_size;

        for row in 0..clipped_height as usize {
            let src = (y as usize + row) * src_stride + x as usize * pixel_size;
            let dst = row * dst_stride;
            out.data_mut()[dst..dst + dst_stride]
                .copy_from_slice(&self.data()[src..src + dst_stride]);
        }

        Ok(out)
    }

    /// Pastes a rectangle of `src` into this image at (`dst_x`, `dst_y`),
    /// clipping to both images. Origins outside either image make the call
    /// a silent no-op; a pixel format mismatch aborts without copying.
    pub fn insert_region(
        &mut self,
        src: &ImageBuffer,
        dst_x: u32,
        dst_y: u32,
        src_x: u32,
        src_y: u32,
        src_width: u32,
        src_height: u32,
    ) -> Result<(), TransformError> {
        if self.format() != src.format() {
            return Err(TransformError::FormatMismatch {
                src: src.format(),
                dst: self.format(),
            });
        }
        let pixel_size = self.require_uncompressed()?;

        if dst_x >= self.width()
            || dst_y >= self.height()
            || src_x >= src.width()
            || src_y >= src.height()
        {
            return Ok(());
        }

        let copy_width = src_width
            .min(src.width() - src_x)
            .min(self.width() - dst_x) as usize;
        let copy_height = src_height
            .min(src.height() - src_y)
            .min(self.height() - dst_y) as usize;

        let src_stride = src.width() as usize * pixel_size;
        let dst_stride = self.width() as usize * pixel_size;
        let row_bytes = copy_width * pixel_size;

        for row in 0..copy_height {
            let s = (src_y as usize + row) * src_stride + src_x as usize * pixel_size;
            let d = (dst_y as usize + row) * dst_stride + dst_x as usize * pixel_size;
            self.data_mut()[d..d + row_bytes].copy_from_slice(&src.data()[s..s + row_bytes]);
        }

        Ok(())
    }

    /// Mirrors each row.
    pub fn flip_horizontal(&mut self) -> Result<(), TransformError> {
        let pixel_size = self.require_uncompressed()?;
        let width = self.width() as usize;
        let height = self.height() as usize;
        let stride = width * pixel_size;

        let data = self.data_mut();
        for row in 0..height {
            for col in 0..width / 2 {
                let a = row * stride + col * pixel_size;
                let b = row * stride + (width - 1 - col) * pixel_size;
                for k in 0..pixel_size {
                    data.swap(a + k, b + k);
                }
            }
        }
        Ok(())
    }

    /// Mirrors the row order.
    pub fn flip_vertical(&mut self) -> Result<(), TransformError> {
        let pixel_size = self.require_uncompressed()?;
        let height = self.height() as usize;
        let stride = self.width() as usize * pixel_size;

        let data = self.data_mut();
        for row in 0..height / 2 {
            let a = row * stride;
            let b = (height - 1 - row) * stride;
            for k in 0..stride {
                data.swap(a + k, b + k);
            }
        }
        Ok(())
    }

    /// Rotates a square image 90 degrees clockwise.
    pub fn rotate_90_right(&mut self) -> Result<(), TransformError> {
        self.rotate_quarter(true)
    }

    /// Rotates a square image 90 degrees counter-clockwise.
    pub fn rotate_90_left(&mut self) -> Result<(), TransformError> {
        self.rotate_quarter(false)
    }

    fn rotate_quarter(&mut self, clockwise: bool) -> Result<(), TransformError> {
        let pixel_size = self.require_uncompressed()?;
        if self.width() != self.height() {
            return Err(TransformError::NotSquare {
                width: self.width(),
                height: self.height(),
            });
        }

        let n = self.width() as usize;
        let mut new_data = vec![0u8; self.data().len()];

        for y in 0..n {
            for x in 0..n {
                let (src_x, src_y) = if clockwise {
                    (y, n - 1 - x)
                } else {
                    (n - 1 - y, x)
                };
                let src = (src_y * n + src_x) * pixel_size;
                let dst = (y * n + x) * pixel_size;
                new_data[dst..dst + pixel_size]
                    .copy_from_slice(&self.data()[src..src + pixel_size]);
            }
        }

        let (w, h) = (self.width(), self.height());
        self.replace_data(w, h, new_data);
        Ok(())
    }

    /// Rotates by a multiple of 90 degrees. 180 is implemented as a double
    /// flip; other angles are rejected.
    pub fn rotate_deg(&mut self, degrees: i32) -> Result<(), TransformError> {
        match degrees.rem_euclid(360) {
            0 => Ok(()),
            90 => self.rotate_90_right(),
            180 => {
                self.flip_horizontal()?;
                self.flip_vertical()
            }
            270 => self.rotate_90_left(),
            _ => Err(TransformError::UnsupportedAngle(degrees)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;

    fn gradient(width: u32, height: u32) -> ImageBuffer {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0, 255]);
            }
        }
        ImageBuffer::from_data(width, height, PixelFormat::Rgba8888, data).unwrap()
    }

    fn pixel(img: &ImageBuffer, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * img.width() + x) * 4) as usize;
        img.data()[offset..offset + 4].try_into().unwrap()
    }

    #[test]
    fn test_resize_image_nearest_neighbor() {
        let mut img = gradient(4, 4);
        img.resize_image(2, 2).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
        // dst 0 samples round(0 * 2.0) = 0; dst 1 samples round(1 * 2.0) = 2.
        assert_eq!(pixel(&img, 0, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&img, 1, 1), [2, 2, 0, 255]);
    }

    #[test]
    fn test_resize_image_clamps_source_coordinate() {
        let mut img = gradient(3, 1);
        img.resize_image(6, 1).unwrap();
        // Last destination pixel would sample round(5 * 0.5) = 3, clamped to 2.
        assert_eq!(pixel(&img, 5, 0), [2, 0, 0, 255]);
    }

    #[test]
    fn test_resize_canvas_grow_zero_fills() {
        let mut img = gradient(2, 2);
        img.resize_canvas(4, 3).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert_eq!(pixel(&img, 1, 1), [1, 1, 0, 255]);
        assert_eq!(pixel(&img, 3, 0), [0, 0, 0, 0]);
        assert_eq!(pixel(&img, 0, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_resize_canvas_crop_preserves_origin() {
        let mut img = gradient(4, 4);
        img.resize_canvas(2, 2).unwrap();
        assert_eq!(pixel(&img, 1, 1), [1, 1, 0, 255]);
    }

    #[test]
    fn test_resize_to_square_pads_to_max_side() {
        let mut img = gradient(4, 2);
        img.resize_to_square().unwrap();
        assert_eq!((img.width(), img.height()), (4, 4));
    }

    #[test]
    fn test_ensure_power_of_two() {
        let mut img = gradient(5, 8);
        img.ensure_power_of_two().unwrap();
        assert_eq!((img.width(), img.height()), (8, 8));

        let before = img.clone();
        img.ensure_power_of_two().unwrap();
        assert_eq!(img, before);
    }

    #[test]
    fn test_copy_region_clips_to_source() {
        let img = gradient(4, 4);
        let region = img.copy_region(2, 2, 10, 10).unwrap();
        assert_eq!((region.width(), region.height()), (2, 2));
        assert_eq!(pixel(&region, 0, 0), [2, 2, 0, 255]);
        assert_eq!(pixel(&region, 1, 1), [3, 3, 0, 255]);
    }

    #[test]
    fn test_copy_region_outside_is_invalid() {
        let img = gradient(4, 4);
        assert!(matches!(
            img.copy_region(4, 0, 1, 1),
            Err(TransformError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn test_insert_region_clips_and_copies() {
        let mut dst = ImageBuffer::new(4, 4, PixelFormat::Rgba8888).unwrap();
        let src = gradient(4, 4);
        dst.insert_region(&src, 2, 2, 0, 0, 4, 4).unwrap();
        assert_eq!(pixel(&dst, 2, 2), [0, 0, 0, 255]);
        assert_eq!(pixel(&dst, 3, 3), [1, 1, 0, 255]);
        assert_eq!(pixel(&dst, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_insert_region_format_mismatch_copies_nothing() {
        let mut dst = ImageBuffer::new(4, 4, PixelFormat::Rgb888).unwrap();
        let before = dst.clone();
        let src = gradient(4, 4);
        let err = dst.insert_region(&src, 0, 0, 0, 0, 4, 4);
        assert!(matches!(err, Err(TransformError::FormatMismatch { .. })));
        assert_eq!(dst, before);
    }

    #[test]
    fn test_flip_horizontal() {
        let mut img = gradient(4, 2);
        img.flip_horizontal().unwrap();
        assert_eq!(pixel(&img, 0, 0), [3, 0, 0, 255]);
        assert_eq!(pixel(&img, 3, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_flip_vertical() {
        let mut img = gradient(2, 4);
        img.flip_vertical().unwrap();
        assert_eq!(pixel(&img, 0, 0), [0, 3, 0, 255]);
        assert_eq!(pixel(&img, 0, 3), [0, 0, 0, 255]);
    }

    #[test]
    fn test_rotate_right_then_left_is_identity() {
        let mut img = gradient(4, 4);
        let original = img.clone();
        img.rotate_90_right().unwrap();
        assert_ne!(img, original);
        img.rotate_90_left().unwrap();
        assert_eq!(img, original);
    }

    #[test]
    fn test_rotate_right_moves_top_left_to_top_right() {
        let mut img = gradient(2, 2);
        img.rotate_90_right().unwrap();
        // Clockwise: (0,0) ends up at (1,0).
        assert_eq!(pixel(&img, 1, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&img, 0, 0), [0, 1, 0, 255]);
    }

    #[test]
    fn test_rotate_requires_square() {
        let mut img = gradient(4, 2);
        assert_eq!(
            img.rotate_90_right(),
            Err(TransformError::NotSquare {
                width: 4,
                height: 2
            })
        );
    }

    #[test]
    fn test_rotate_deg_180_equals_double_flip() {
        let mut a = gradient(4, 4);
        let mut b = gradient(4, 4);
        a.rotate_deg(180).unwrap();
        b.flip_horizontal().unwrap();
        b.flip_vertical().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rotate_deg_negative_angles() {
        let mut a = gradient(4, 4);
        let mut b = gradient(4, 4);
        a.rotate_deg(-90).unwrap();
        b.rotate_90_left().unwrap();
        assert_eq!(a, b);
        assert!(matches!(
            a.rotate_deg(45),
            Err(TransformError::UnsupportedAngle(45))
        ));
    }

    #[test]
    fn test_block_format_transforms_rejected() {
        let mut img = ImageBuffer::new(8, 8, PixelFormat::Dxt1).unwrap();
        assert!(matches!(
            img.flip_horizontal(),
            Err(TransformError::UnsupportedTransform(PixelFormat::Dxt1))
        ));
        assert!(matches!(
            img.resize_image(4, 4),
            Err(TransformError::UnsupportedTransform(PixelFormat::Dxt1))
        ));
    }
}
