//! Pixel format metadata and hardware capability registry.
//!
//! Every pixel format the pipeline can touch is described exactly once in
//! the [`PixelFormatRegistry`]. Static properties (bit width, block
//! compression, wire code) live on [`PixelFormat`] itself; the registry adds
//! the one device-dependent property, `is_hardware_supported`, which is
//! recomputed from a [`HardwareCaps`] probe and read-only afterwards.
//!
//! Allocation math for block-compressed formats must go through
//! [`data_size`], never through `size_in_bytes` (which reports 0 for
//! sub-byte formats and exists for diagnostics only).

mod registry;

pub use registry::{HardwareCaps, PixelFormatDescriptor, PixelFormatRegistry};

use thiserror::Error;

/// Errors produced when mapping on-disk format codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A wire code read from a container file maps to no known format.
    #[error("unknown pixel format code: {0:#018x}")]
    UnknownFormat(u64),
}

/// Builds an uncompressed-format wire code out of channel names and widths,
/// mirroring the container format's eight-byte pixel format field.
const fn channel_code(c0: u8, c1: u8, c2: u8, c3: u8, b0: u8, b1: u8, b2: u8, b3: u8) -> u64 {
    (c0 as u64)
        | (c1 as u64) << 8
        | (c2 as u64) << 16
        | (c3 as u64) << 24
        | (b0 as u64) << 32
        | (b1 as u64) << 40
        | (b2 as u64) << 48
        | (b3 as u64) << 56
}

/// Every pixel format known to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    A8,
    A16,
    Rgba4444,
    Rgba5551,
    Rgb565,
    Rgb888,
    Rgba8888,
    Dxt1,
    Dxt1a,
    Dxt3,
    Dxt5,
    Dxt5nm,
    Etc1,
    Pvrtc2Rgb,
    Pvrtc2Rgba,
    Pvrtc4Rgb,
    Pvrtc4Rgba,
    AtcRgb,
    AtcRgbaExplicit,
    AtcRgbaInterpolated,
}

impl PixelFormat {
    /// All formats, in registry order.
    pub const ALL: [PixelFormat; 20] = [
        PixelFormat::A8,
        PixelFormat::A16,
        PixelFormat::Rgba4444,
        PixelFormat::Rgba5551,
        PixelFormat::Rgb565,
        PixelFormat::Rgb888,
        PixelFormat::Rgba8888,
        PixelFormat::Dxt1,
        PixelFormat::Dxt1a,
        PixelFormat::Dxt3,
        PixelFormat::Dxt5,
        PixelFormat::Dxt5nm,
        PixelFormat::Etc1,
        PixelFormat::Pvrtc2Rgb,
        PixelFormat::Pvrtc2Rgba,
        PixelFormat::Pvrtc4Rgb,
        PixelFormat::Pvrtc4Rgba,
        PixelFormat::AtcRgb,
        PixelFormat::AtcRgbaExplicit,
        PixelFormat::AtcRgbaInterpolated,
    ];

    /// Display name used in logs and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::A8 => "A8",
            PixelFormat::A16 => "A16",
            PixelFormat::Rgba4444 => "RGBA4444",
            PixelFormat::Rgba5551 => "RGBA5551",
            PixelFormat::Rgb565 => "RGB565",
            PixelFormat::Rgb888 => "RGB888",
            PixelFormat::Rgba8888 => "RGBA8888",
            PixelFormat::Dxt1 => "DXT1",
            PixelFormat::Dxt1a => "DXT1A",
            PixelFormat::Dxt3 => "DXT3",
            PixelFormat::Dxt5 => "DXT5",
            PixelFormat::Dxt5nm => "DXT5NM",
            PixelFormat::Etc1 => "ETC1",
            PixelFormat::Pvrtc2Rgb => "PVRTC2_RGB",
            PixelFormat::Pvrtc2Rgba => "PVRTC2_RGBA",
            PixelFormat::Pvrtc4Rgb => "PVRTC4_RGB",
            PixelFormat::Pvrtc4Rgba => "PVRTC4_RGBA",
            PixelFormat::AtcRgb => "ATC_RGB",
            PixelFormat::AtcRgbaExplicit => "ATC_RGBA_EXPLICIT",
            PixelFormat::AtcRgbaInterpolated => "ATC_RGBA_INTERPOLATED",
        }
    }

    /// Bits of storage per texel.
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::A8 => 8,
            PixelFormat::A16 => 16,
            PixelFormat::Rgba4444 | PixelFormat::Rgba5551 | PixelFormat::Rgb565 => 16,
            PixelFormat::Rgb888 => 24,
            PixelFormat::Rgba8888 => 32,
            PixelFormat::Dxt1 | PixelFormat::Dxt1a | PixelFormat::Etc1 => 4,
            PixelFormat::Dxt3 | PixelFormat::Dxt5 | PixelFormat::Dxt5nm => 8,
            PixelFormat::Pvrtc2Rgb | PixelFormat::Pvrtc2Rgba => 2,
            PixelFormat::Pvrtc4Rgb | PixelFormat::Pvrtc4Rgba => 4,
            PixelFormat::AtcRgb => 4,
            PixelFormat::AtcRgbaExplicit | PixelFormat::AtcRgbaInterpolated => 8,
        }
    }

    /// Whether data is organized in fixed-size compression blocks rather
    /// than per-pixel. Block formats have a minimum representable footprint.
    pub fn is_block_compressed(self) -> bool {
        !matches!(
            self,
            PixelFormat::A8
                | PixelFormat::A16
                | PixelFormat::Rgba4444
                | PixelFormat::Rgba5551
                | PixelFormat::Rgb565
                | PixelFormat::Rgb888
                | PixelFormat::Rgba8888
        )
    }

    /// Whole bytes per texel. Reports 0 for sub-byte (block) formats; this
    /// is a diagnostic value, allocation goes through [`data_size`].
    pub fn size_in_bytes(self) -> u32 {
        self.bits_per_pixel() / 8
    }

    /// Eight-byte pixel format code used in the container header.
    pub fn wire_code(self) -> u64 {
        match self {
            PixelFormat::A8 => channel_code(b'a', 0, 0, 0, 8, 0, 0, 0),
            PixelFormat::A16 => channel_code(b'a', 0, 0, 0, 16, 0, 0, 0),
            PixelFormat::Rgba4444 => channel_code(b'r', b'g', b'b', b'a', 4, 4, 4, 4),
            PixelFormat::Rgba5551 => channel_code(b'r', b'g', b'b', b'a', 5, 5, 5, 1),
            PixelFormat::Rgb565 => channel_code(b'r', b'g', b'b', 0, 5, 6, 5, 0),
            PixelFormat::Rgb888 => channel_code(b'r', b'g', b'b', 0, 8, 8, 8, 0),
            PixelFormat::Rgba8888 => channel_code(b'r', b'g', b'b', b'a', 8, 8, 8, 8),
            // Compressed formats use the low 32 bits only.
            PixelFormat::Pvrtc2Rgb => 0,
            PixelFormat::Pvrtc2Rgba => 1,
            PixelFormat::Pvrtc4Rgb => 2,
            PixelFormat::Pvrtc4Rgba => 3,
            PixelFormat::Etc1 => 6,
            PixelFormat::Dxt1 => 7,
            PixelFormat::Dxt3 => 9,
            PixelFormat::Dxt5 => 11,
            // Extension codes outside the standard compressed range.
            PixelFormat::Dxt1a => 200,
            PixelFormat::Dxt5nm => 201,
            PixelFormat::AtcRgb => 202,
            PixelFormat::AtcRgbaExplicit => 203,
            PixelFormat::AtcRgbaInterpolated => 204,
        }
    }

    /// Inverse of [`wire_code`](Self::wire_code).
    pub fn from_wire_code(code: u64) -> Result<PixelFormat, FormatError> {
        PixelFormat::ALL
            .iter()
            .copied()
            .find(|f| f.wire_code() == code)
            .ok_or(FormatError::UnknownFormat(code))
    }
}

/// Byte size of one image plane of `width` × `height` texels.
///
/// Non-block formats are exact: `width * height * bpp / 8`. Block formats
/// below the 4×4 block footprint still occupy one full block per axis, so
/// the dimensions are clamped asymmetrically: the smaller dimension and the
/// larger dimension are each raised to at least 4 before multiplying.
/// Compressed encoders emit whole blocks even for tiny images; dropping
/// this clamp under-allocates small mip levels.
pub fn data_size(format: PixelFormat, width: u32, height: u32) -> usize {
    let bpp = format.bits_per_pixel() as usize;
    let (w, h) = (width as usize, height as usize);

    if format.is_block_compressed() && (width < 4 || height < 4) {
        let min = w.min(h).max(4);
        let max = w.max(h).max(4);
        return bpp * min * max / 8;
    }

    w * h * bpp / 8
}
