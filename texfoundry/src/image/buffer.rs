//! The canonical in-memory image.

use super::TransformError;
use crate::format::{self, PixelFormat};

/// One of the six faces of a cubemap, identified by axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    /// Canonical face order: +X, -X, +Y, -Y, +Z, -Z.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    /// Index in canonical order, 0..6.
    pub fn index(self) -> u32 {
        match self {
            CubeFace::PositiveX => 0,
            CubeFace::NegativeX => 1,
            CubeFace::PositiveY => 2,
            CubeFace::NegativeY => 3,
            CubeFace::PositiveZ => 4,
            CubeFace::NegativeZ => 5,
        }
    }

    pub fn from_index(index: u32) -> Option<CubeFace> {
        CubeFace::ALL.get(index as usize).copied()
    }

    /// Axis letter as written in the container cube-order metadata block:
    /// uppercase for the positive direction, lowercase for the negative.
    pub fn axis_letter(self) -> u8 {
        match self {
            CubeFace::PositiveX => b'X',
            CubeFace::NegativeX => b'x',
            CubeFace::PositiveY => b'Y',
            CubeFace::NegativeY => b'y',
            CubeFace::PositiveZ => b'Z',
            CubeFace::NegativeZ => b'z',
        }
    }

    pub fn from_axis_letter(letter: u8) -> Option<CubeFace> {
        match letter {
            b'X' => Some(CubeFace::PositiveX),
            b'x' => Some(CubeFace::NegativeX),
            b'Y' => Some(CubeFace::PositiveY),
            b'y' => Some(CubeFace::NegativeY),
            b'Z' => Some(CubeFace::PositiveZ),
            b'z' => Some(CubeFace::NegativeZ),
            _ => None,
        }
    }
}

/// Raw pixel bytes plus the metadata required to interpret them.
///
/// The data length invariant holds at all times: `data.len()` equals
/// [`format::data_size`] for the buffer's dimensions and format, including
/// the block-footprint rounding for compressed formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    mipmap_level: Option<u32>,
    cube_face: Option<CubeFace>,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Allocates a zero-filled image.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, TransformError> {
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidDimensions { width, height });
        }
        let size = format::data_size(format, width, height);
        Ok(ImageBuffer {
            width,
            height,
            format,
            mipmap_level: None,
            cube_face: None,
            data: vec![0; size],
        })
    }

    /// Wraps existing pixel bytes, validating the size invariant.
    pub fn from_data(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, TransformError> {
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidDimensions { width, height });
        }
        let expected = format::data_size(format, width, height);
        if data.len() != expected {
            return Err(TransformError::DataSizeMismatch {
                got: data.len(),
                expected,
            });
        }
        Ok(ImageBuffer {
            width,
            height,
            format,
            mipmap_level: None,
            cube_face: None,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Mipmap level index, or `None` when the image is not part of a chain.
    pub fn mipmap_level(&self) -> Option<u32> {
        self.mipmap_level
    }

    pub fn set_mipmap_level(&mut self, level: Option<u32>) {
        self.mipmap_level = level;
    }

    /// Cube face tag, or `None` for a plain 2D image.
    pub fn cube_face(&self) -> Option<CubeFace> {
        self.cube_face
    }

    pub fn set_cube_face(&mut self, face: Option<CubeFace>) {
        self.cube_face = face;
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer, handing its bytes to the next owner.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Replaces pixel storage and dimensions together so the size invariant
    /// never observably breaks. Internal to the transform engine.
    pub(crate) fn replace_data(&mut self, width: u32, height: u32, data: Vec<u8>) {
        debug_assert_eq!(data.len(), format::data_size(self.format, width, height));
        self.width = width;
        self.height = height;
        self.data = data;
    }

    /// Whole bytes per texel; transforms are only defined when this is > 0.
    pub(crate) fn pixel_size(&self) -> usize {
        (self.format.bits_per_pixel() / 8) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_allocates_exact_size() {
        let img = ImageBuffer::new(16, 8, PixelFormat::Rgba8888).unwrap();
        assert_eq!(img.data().len(), 16 * 8 * 4);
        assert_eq!(img.mipmap_level(), None);
        assert_eq!(img.cube_face(), None);
    }

    #[test]
    fn test_new_block_format_small_image() {
        // One full DXT1 block even for a 1x1 image.
        let img = ImageBuffer::new(1, 1, PixelFormat::Dxt1).unwrap();
        assert_eq!(img.data().len(), 8);
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            ImageBuffer::new(0, 4, PixelFormat::Rgba8888),
            Err(TransformError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_from_data_validates_length() {
        let err = ImageBuffer::from_data(2, 2, PixelFormat::Rgba8888, vec![0; 15]);
        assert_eq!(
            err,
            Err(TransformError::DataSizeMismatch {
                got: 15,
                expected: 16
            })
        );
        assert!(ImageBuffer::from_data(2, 2, PixelFormat::Rgba8888, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_cube_face_canonical_order() {
        for (i, face) in CubeFace::ALL.iter().enumerate() {
            assert_eq!(face.index(), i as u32);
            assert_eq!(CubeFace::from_index(i as u32), Some(*face));
        }
        assert_eq!(CubeFace::from_index(6), None);
    }

    #[test]
    fn test_cube_face_axis_letters() {
        let letters: Vec<u8> = CubeFace::ALL.iter().map(|f| f.axis_letter()).collect();
        assert_eq!(letters, b"XxYyZz");
        for face in CubeFace::ALL {
            assert_eq!(CubeFace::from_axis_letter(face.axis_letter()), Some(face));
        }
        assert_eq!(CubeFace::from_axis_letter(b'Q'), None);
    }
}
