//! Read-only texture source descriptions consumed by the loader.

use crate::format::PixelFormat;
use crate::image::CubeFace;
use std::collections::HashMap;
use std::path::PathBuf;

/// A hardware compression-capability profile. Each family names one
/// on-disk variant of a texture; `Origin` is the uncompressed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuFamily {
    PowervrIos,
    PowervrAndroid,
    Tegra,
    Mali,
    Adreno,
    Dx11,
    Origin,
}

impl GpuFamily {
    pub const ALL: [GpuFamily; 7] = [
        GpuFamily::PowervrIos,
        GpuFamily::PowervrAndroid,
        GpuFamily::Tegra,
        GpuFamily::Mali,
        GpuFamily::Adreno,
        GpuFamily::Dx11,
        GpuFamily::Origin,
    ];

    /// Family name for logs.
    pub fn name(self) -> &'static str {
        match self {
            GpuFamily::PowervrIos => "powervr-ios",
            GpuFamily::PowervrAndroid => "powervr-android",
            GpuFamily::Tegra => "tegra",
            GpuFamily::Mali => "mali",
            GpuFamily::Adreno => "adreno",
            GpuFamily::Dx11 => "dx11",
            GpuFamily::Origin => "origin",
        }
    }
}

/// The on-disk files carrying one GPU family's variant of a texture.
///
/// Single-mip files each hold exactly one level, ordered largest first;
/// the multi-mip file holds the rest of the chain in one container.
#[derive(Debug, Clone, Default)]
pub struct GpuSource {
    pub format: Option<PixelFormat>,
    pub single_mip_files: Vec<PathBuf>,
    pub multi_mip_file: Option<PathBuf>,
}

impl GpuSource {
    /// A source backed by one file holding the whole chain.
    pub fn single_file(path: impl Into<PathBuf>) -> Self {
        GpuSource {
            format: None,
            single_mip_files: Vec::new(),
            multi_mip_file: Some(path.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.single_mip_files.is_empty() && self.multi_mip_file.is_none()
    }
}

/// Everything the loader needs to know about one texture asset. Populated
/// by an external descriptor system and read-only here.
#[derive(Debug, Clone, Default)]
pub struct TextureDescriptor {
    pub sources: HashMap<GpuFamily, GpuSource>,
    pub cube_faces: [Option<PathBuf>; 6],
    pub generate_mipmaps: bool,
    pub is_normal_map: bool,
}

impl TextureDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, family: GpuFamily, source: GpuSource) -> Self {
        self.sources.insert(family, source);
        self
    }

    pub fn with_cube_face(mut self, face: CubeFace, path: impl Into<PathBuf>) -> Self {
        self.cube_faces[face.index() as usize] = Some(path.into());
        self
    }

    /// Cubemap requests carry at least one face path.
    pub fn is_cubemap(&self) -> bool {
        self.cube_faces.iter().any(|f| f.is_some())
    }

    /// A short identifier for error reports, the first path the descriptor
    /// names.
    pub fn display_path(&self) -> String {
        let from_faces = self
            .cube_faces
            .iter()
            .flatten()
            .next()
            .map(|p| p.display().to_string());
        let from_sources = self.sources.values().find_map(|s| {
            s.multi_mip_file
                .as_ref()
                .or_else(|| s.single_mip_files.first())
                .map(|p| p.display().to_string())
        });
        from_faces
            .or(from_sources)
            .unwrap_or_else(|| "<no source files>".into())
    }
}
