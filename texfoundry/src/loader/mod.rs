//! Texture asset loading with GPU-family fallback.
//!
//! A [`TextureAssetLoader`] walks an ordered list of [`GpuFamily`] variants
//! for a texture, loading the first one whose files decode, and substitutes
//! a deterministic checkerboard placeholder when every variant fails. A
//! missing or corrupt texture therefore never becomes a hard failure for
//! the caller.

mod descriptor;
mod error;
mod placeholder;

pub use crate::codec::LoadingParams;
pub use descriptor::{GpuFamily, GpuSource, TextureDescriptor};
pub use error::LoadError;
pub use placeholder::placeholder_image;

use crate::codec::{CodecDispatcher, CodecError};
use crate::image::{CubeFace, ImageBuffer};
use tracing::{debug, error, warn};

/// The outcome of one load request. `loaded_as` names the GPU family that
/// supplied the data; it is `None` for the placeholder.
#[derive(Debug)]
pub struct LoadedTexture {
    /// Images ordered mip-major, face-minor.
    pub images: Vec<ImageBuffer>,
    pub loaded_as: Option<GpuFamily>,
    pub is_placeholder: bool,
    /// Mip array size, `1 + max mip index present`. This can exceed the
    /// number of images when a source arrived with a sparse mip set.
    pub mip_levels: u32,
}

pub struct TextureAssetLoader {
    dispatcher: CodecDispatcher,
    gpu_loading_order: Vec<GpuFamily>,
}

impl TextureAssetLoader {
    /// The fallback order should list device-native families first and
    /// [`GpuFamily::Origin`] last.
    pub fn new(dispatcher: CodecDispatcher, gpu_loading_order: Vec<GpuFamily>) -> Self {
        TextureAssetLoader {
            dispatcher,
            gpu_loading_order,
        }
    }

    /// Loads the texture described by `descriptor`.
    ///
    /// Pinning a family restricts the attempt to that family alone;
    /// otherwise the configured fallback order is walked until one family
    /// yields images. Exhaustion resolves to the placeholder, never an
    /// error.
    pub fn load(
        &self,
        descriptor: &TextureDescriptor,
        pinned: Option<GpuFamily>,
        params: &LoadingParams,
    ) -> LoadedTexture {
        let order: Vec<GpuFamily> = match pinned {
            Some(family) => vec![family],
            None => self.gpu_loading_order.clone(),
        };

        for &family in &order {
            match self.try_family(descriptor, family, params) {
                Ok(images) => {
                    let mip_levels = mip_array_size(&images);
                    debug!(
                        family = family.name(),
                        images = images.len(),
                        mip_levels,
                        "texture loaded"
                    );
                    return LoadedTexture {
                        images,
                        loaded_as: Some(family),
                        is_placeholder: false,
                        mip_levels,
                    };
                }
                Err(err) => {
                    warn!(family = family.name(), error = %err, "texture source failed");
                }
            }
        }

        let exhausted = LoadError::ExhaustedFallback {
            path: descriptor.display_path(),
            families: order,
        };
        error!(error = %exhausted, "substituting placeholder texture");
        LoadedTexture {
            images: vec![placeholder_image()],
            loaded_as: None,
            is_placeholder: true,
            mip_levels: 1,
        }
    }

    fn try_family(
        &self,
        descriptor: &TextureDescriptor,
        family: GpuFamily,
        params: &LoadingParams,
    ) -> Result<Vec<ImageBuffer>, LoadError> {
        let mut images = if descriptor.is_cubemap() {
            self.load_cube_faces(descriptor, params)?
        } else {
            let source = descriptor
                .sources
                .get(&family)
                .filter(|s| !s.is_empty())
                .ok_or(LoadError::NoSource(family))?;
            self.load_flat(descriptor, source, params)?
        };

        if images.is_empty() {
            return Err(LoadError::NoImages(family));
        }
        check_minimum_size(&images, params)?;
        sort_and_check_density(&mut images);
        Ok(images)
    }

    /// Loads up to six independent face files, tagging each image with its
    /// face. Empty face slots are skipped.
    fn load_cube_faces(
        &self,
        descriptor: &TextureDescriptor,
        params: &LoadingParams,
    ) -> Result<Vec<ImageBuffer>, LoadError> {
        let mut images = Vec::new();
        for (index, path) in descriptor.cube_faces.iter().enumerate() {
            let Some(path) = path else { continue };
            let face = CubeFace::from_index(index as u32);
            for mut img in self.dispatcher.load_from_path(path, params)? {
                if img.cube_face().is_none() {
                    img.set_cube_face(face);
                }
                images.push(img);
            }
        }

        if let Some(first) = images.first() {
            let format = first.format();
            if images.iter().any(|img| img.format() != format) {
                return Err(LoadError::InconsistentCubeFormats);
            }
        }

        if descriptor.generate_mipmaps {
            let mut chained = Vec::new();
            for img in images {
                let chain = img
                    .generate_mipmap_chain(descriptor.is_normal_map)
                    .map_err(CodecError::from)?;
                chained.extend(chain);
            }
            images = chained;
        }
        Ok(images)
    }

    /// Non-cubemap path: single-mip files first, then the multi-mip
    /// container, then power-of-two padding.
    fn load_flat(
        &self,
        descriptor: &TextureDescriptor,
        source: &GpuSource,
        params: &LoadingParams,
    ) -> Result<Vec<ImageBuffer>, LoadError> {
        let mut images = Vec::new();
        let mut next_index = params.first_mipmap_index;

        // The mip skip consumes the single-mip files before it applies to
        // the container chain.
        let skipped = params.base_mipmap as usize;
        for path in source.single_mip_files.iter().skip(skipped) {
            let file_params = LoadingParams {
                base_mipmap: 0,
                first_mipmap_index: next_index,
                ..*params
            };
            let decoded = self.dispatcher.load_from_path(path, &file_params)?;
            next_index += decoded.len() as u32;
            images.extend(decoded);
        }

        if let Some(path) = &source.multi_mip_file {
            let residual =
                params.base_mipmap.saturating_sub(source.single_mip_files.len() as u32);
            let file_params = LoadingParams {
                base_mipmap: residual,
                first_mipmap_index: next_index,
                ..*params
            };
            images.extend(self.dispatcher.load_from_path(path, &file_params)?);
        }

        for img in &mut images {
            if !img.format().is_block_compressed() {
                img.ensure_power_of_two().map_err(CodecError::from)?;
            }
        }

        if descriptor.generate_mipmaps && images.len() == 1 {
            if let Some(base) = images.pop() {
                let chain = base
                    .generate_mipmap_chain(descriptor.is_normal_map)
                    .map_err(CodecError::from)?;
                images = chain.collect();
            }
        }
        Ok(images)
    }
}

/// Block-compressed base levels below the configured minimum cannot be
/// represented; fail the family before handing out unusable images.
fn check_minimum_size(images: &[ImageBuffer], params: &LoadingParams) -> Result<(), LoadError> {
    let base_level = images.iter().filter_map(|i| i.mipmap_level()).min();
    for img in images {
        if img.mipmap_level() != base_level || !img.format().is_block_compressed() {
            continue;
        }
        if img.width() < params.minimal_width || img.height() < params.minimal_height {
            return Err(LoadError::UnsupportedMinimumSize {
                format: img.format(),
                width: img.width(),
                height: img.height(),
                min_width: params.minimal_width,
                min_height: params.minimal_height,
            });
        }
    }
    Ok(())
}

/// Orders the set mip-major, face-minor and warns about sparse mip sets.
fn sort_and_check_density(images: &mut [ImageBuffer]) {
    images.sort_by_key(|img| {
        (
            img.mipmap_level().unwrap_or(0),
            img.cube_face().map(|f| f.index()).unwrap_or(0),
        )
    });

    let faces = images
        .iter()
        .filter(|img| img.mipmap_level() == images[0].mipmap_level())
        .count() as u32;
    let expected = mip_array_size(images) * faces.max(1);
    if (images.len() as u32) < expected {
        warn!(
            present = images.len(),
            expected, "sparse mip set, sizing the mip array by the highest index"
        );
    }
}

fn mip_array_size(images: &[ImageBuffer]) -> u32 {
    images
        .iter()
        .filter_map(|img| img.mipmap_level())
        .max()
        .map(|max| max + 1)
        .unwrap_or(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{HardwareCaps, PixelFormat, PixelFormatRegistry};
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};
    use std::path::Path;

    fn loader(order: Vec<GpuFamily>) -> TextureAssetLoader {
        let registry = PixelFormatRegistry::new(&HardwareCaps::all());
        TextureAssetLoader::new(CodecDispatcher::new(registry), order)
    }

    fn write_png(path: &Path, side: u32) {
        let img = image::RgbaImage::from_pixel(side, side, image::Rgba([50, 60, 70, 255]));
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(&img, side, side, ExtendedColorType::Rgba8)
            .unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_fallback_reaches_existing_family() {
        let dir = tempfile::tempdir().unwrap();
        let origin_path = dir.path().join("tex.png");
        write_png(&origin_path, 8);

        let desc = TextureDescriptor::new()
            .with_source(GpuFamily::Tegra, GpuSource::single_file(dir.path().join("tex.pvr")))
            .with_source(GpuFamily::Origin, GpuSource::single_file(&origin_path));

        let loaded = loader(vec![GpuFamily::Tegra, GpuFamily::Origin]).load(
            &desc,
            None,
            &LoadingParams::default(),
        );
        assert_eq!(loaded.loaded_as, Some(GpuFamily::Origin));
        assert!(!loaded.is_placeholder);
        assert_eq!(loaded.images.len(), 1);
    }

    #[test]
    fn test_pinned_family_skips_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let origin_path = dir.path().join("tex.png");
        write_png(&origin_path, 8);

        // Origin exists but the pin restricts the attempt to Tegra.
        let desc = TextureDescriptor::new()
            .with_source(GpuFamily::Origin, GpuSource::single_file(&origin_path));
        let loaded = loader(vec![GpuFamily::Tegra, GpuFamily::Origin]).load(
            &desc,
            Some(GpuFamily::Tegra),
            &LoadingParams::default(),
        );
        assert!(loaded.is_placeholder);
        assert_eq!(loaded.loaded_as, None);
    }

    #[test]
    fn test_placeholder_on_exhaustion_is_deterministic() {
        let desc = TextureDescriptor::new()
            .with_source(GpuFamily::Origin, GpuSource::single_file("/nonexistent/a.png"));
        let l = loader(vec![GpuFamily::Origin]);

        let first = l.load(&desc, None, &LoadingParams::default());
        let second = l.load(&desc, None, &LoadingParams::default());
        assert!(first.is_placeholder && second.is_placeholder);
        assert_eq!(first.images, second.images);
        assert_eq!(first.mip_levels, 1);
    }

    #[test]
    fn test_generate_mipmaps_builds_full_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tex.png");
        write_png(&path, 16);

        let desc = TextureDescriptor {
            generate_mipmaps: true,
            ..TextureDescriptor::new()
                .with_source(GpuFamily::Origin, GpuSource::single_file(&path))
        };
        let loaded = loader(vec![GpuFamily::Origin]).load(&desc, None, &LoadingParams::default());

        // 16x16 chains down to 1x1 in 5 levels.
        assert_eq!(loaded.images.len(), 5);
        assert_eq!(loaded.mip_levels, 5);
        let last = loaded.images.last().unwrap();
        assert_eq!((last.width(), last.height()), (1, 1));
    }

    #[test]
    fn test_cubemap_faces_are_tagged_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut desc = TextureDescriptor::new()
            .with_source(GpuFamily::Origin, GpuSource::default());
        for face in CubeFace::ALL {
            let path = dir.path().join(format!("face_{}.png", face.index()));
            write_png(&path, 4);
            desc = desc.with_cube_face(face, path);
        }
        desc.sources
            .insert(GpuFamily::Origin, GpuSource::single_file("unused.png"));

        let loaded = loader(vec![GpuFamily::Origin]).load(&desc, None, &LoadingParams::default());
        assert!(!loaded.is_placeholder);
        let faces: Vec<CubeFace> = loaded
            .images
            .iter()
            .map(|img| img.cube_face().unwrap())
            .collect();
        assert_eq!(faces, CubeFace::ALL.to_vec());
    }

    #[test]
    fn test_sparse_faces_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let px = dir.path().join("px.png");
        let nx = dir.path().join("nx.png");
        write_png(&px, 4);
        write_png(&nx, 4);

        let desc = TextureDescriptor::new()
            .with_source(GpuFamily::Origin, GpuSource::single_file("unused.png"))
            .with_cube_face(CubeFace::PositiveX, px)
            .with_cube_face(CubeFace::NegativeX, nx);

        let loaded = loader(vec![GpuFamily::Origin]).load(&desc, None, &LoadingParams::default());
        assert_eq!(loaded.images.len(), 2);
        assert_eq!(loaded.images[0].cube_face(), Some(CubeFace::PositiveX));
        assert_eq!(loaded.images[1].cube_face(), Some(CubeFace::NegativeX));
    }

    #[test]
    fn test_non_power_of_two_origin_is_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tex.png");
        write_png(&path, 6);

        let desc = TextureDescriptor::new()
            .with_source(GpuFamily::Origin, GpuSource::single_file(&path));
        let loaded = loader(vec![GpuFamily::Origin]).load(&desc, None, &LoadingParams::default());
        let img = &loaded.images[0];
        assert_eq!((img.width(), img.height()), (8, 8));
    }

    #[test]
    fn test_minimum_size_fast_fail_for_block_formats() {
        let small = ImageBuffer::new(4, 4, PixelFormat::Dxt1).unwrap();
        let err = check_minimum_size(&[small], &LoadingParams::default());
        assert!(matches!(
            err,
            Err(LoadError::UnsupportedMinimumSize { width: 4, .. })
        ));
    }

    #[test]
    fn test_mip_array_sized_by_max_index() {
        let mut a = ImageBuffer::new(8, 8, PixelFormat::Rgba8888).unwrap();
        a.set_mipmap_level(Some(0));
        let mut b = ImageBuffer::new(2, 2, PixelFormat::Rgba8888).unwrap();
        b.set_mipmap_level(Some(2));
        // Mip 1 is missing; the array is still sized for indices 0..=2.
        assert_eq!(mip_array_size(&[a, b]), 3);
    }
}
