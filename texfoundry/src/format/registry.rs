//! Hardware-capability-aware descriptor table.

use super::PixelFormat;

/// Device capability flags for compressed texture families, supplied by the
/// engine configuration subsystem after probing the active graphics device.
///
/// Uncompressed formats are always supported and carry no flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HardwareCaps {
    pub dxt: bool,
    pub etc1: bool,
    pub pvrtc: bool,
    pub atc: bool,
}

impl HardwareCaps {
    /// Caps with every compressed family available. Useful in tests and for
    /// tooling that runs without a real device.
    pub fn all() -> Self {
        HardwareCaps {
            dxt: true,
            etc1: true,
            pvrtc: true,
            atc: true,
        }
    }

    fn supports(&self, format: PixelFormat) -> bool {
        match format {
            PixelFormat::Dxt1
            | PixelFormat::Dxt1a
            | PixelFormat::Dxt3
            | PixelFormat::Dxt5
            | PixelFormat::Dxt5nm => self.dxt,
            PixelFormat::Etc1 => self.etc1,
            PixelFormat::Pvrtc2Rgb
            | PixelFormat::Pvrtc2Rgba
            | PixelFormat::Pvrtc4Rgb
            | PixelFormat::Pvrtc4Rgba => self.pvrtc,
            PixelFormat::AtcRgb
            | PixelFormat::AtcRgbaExplicit
            | PixelFormat::AtcRgbaInterpolated => self.atc,
            _ => true,
        }
    }
}

/// Per-format metadata: static properties plus the device-dependent
/// hardware support flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatDescriptor {
    pub format: PixelFormat,
    pub name: &'static str,
    pub bits_per_pixel: u32,
    pub is_block_compressed: bool,
    pub is_hardware_supported: bool,
}

/// Immutable snapshot of format descriptors for one device configuration.
///
/// Construct once per capability probe and share by reference; the only
/// writer is [`refresh_hardware_support`](Self::refresh_hardware_support),
/// which must not run concurrently with loads. Cloning the registry takes a
/// snapshot, which is how the dispatcher and loader keep a stable view for
/// the duration of a load.
#[derive(Debug, Clone)]
pub struct PixelFormatRegistry {
    descriptors: [PixelFormatDescriptor; PixelFormat::ALL.len()],
}

impl PixelFormatRegistry {
    /// Builds the table against the given device capabilities.
    pub fn new(caps: &HardwareCaps) -> Self {
        let mut descriptors = PixelFormat::ALL.map(|format| PixelFormatDescriptor {
            format,
            name: format.name(),
            bits_per_pixel: format.bits_per_pixel(),
            is_block_compressed: format.is_block_compressed(),
            is_hardware_supported: false,
        });
        for descriptor in descriptors.iter_mut() {
            descriptor.is_hardware_supported = caps.supports(descriptor.format);
        }
        PixelFormatRegistry { descriptors }
    }

    /// Re-probes every descriptor against new device capabilities. The
    /// single writer: callers sequence this before any load starts.
    pub fn refresh_hardware_support(&mut self, caps: &HardwareCaps) {
        for descriptor in self.descriptors.iter_mut() {
            descriptor.is_hardware_supported = caps.supports(descriptor.format);
        }
    }

    /// Descriptor lookup. Infallible: every `PixelFormat` variant has
    /// exactly one entry.
    pub fn descriptor(&self, format: PixelFormat) -> &PixelFormatDescriptor {
        &self.descriptors[PixelFormat::ALL
            .iter()
            .position(|f| *f == format)
            .expect("every PixelFormat variant is registered")]
    }

    pub fn is_hardware_supported(&self, format: PixelFormat) -> bool {
        self.descriptor(format).is_hardware_supported
    }
}

impl Default for PixelFormatRegistry {
    fn default() -> Self {
        PixelFormatRegistry::new(&HardwareCaps::default())
    }
}
