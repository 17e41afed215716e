//! Image decode/upload and the resident texture store.

use std::path::Path;

use crate::error::TextureLoadError;
use crate::scene::mesh::TextureHandle;
use crate::scene::model::TextureUploader;

/// A resident GPU texture and its default view.
pub struct GpuTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

/// Owns every texture the importers upload, addressed by
/// [`TextureHandle`].
///
/// Slot 0 is a built-in 1x1 white texture, so
/// [`TextureHandle::NULL`] (the substitute for failed loads) always
/// binds something sensible. All GPU resources are released exactly
/// once, when the store drops.
pub struct TextureStore {
    device: wgpu::Device,
    queue: wgpu::Queue,
    sampler: wgpu::Sampler,
    textures: Vec<GpuTexture>,
}

impl TextureStore {
    /// Create a store holding only the white fallback texture.
    #[must_use]
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture Store Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let mut store = Self {
            device: device.clone(),
            queue: queue.clone(),
            sampler,
            textures: Vec::new(),
        };
        // Slot 0: the fallback bound for null handles.
        let _ = store.upload_rgba("Fallback White", 1, 1, &[255; 4]);
        store
    }

    /// The shared repeat/linear sampler.
    #[must_use]
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Number of resident textures, including the fallback.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether the store holds only the fallback texture.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.len() <= 1
    }

    /// View for a handle. Null and dangling handles resolve to the
    /// white fallback.
    #[must_use]
    pub fn view(&self, handle: TextureHandle) -> &wgpu::TextureView {
        self.textures
            .get(handle.0 as usize)
            .map_or(&self.textures[0].view, |t| &t.view)
    }

    /// Upload raw RGBA8 pixels as a new texture and return its handle.
    pub fn upload_rgba(
        &mut self,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> TextureHandle {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(GpuTexture { texture, view });
        handle
    }
}

impl TextureUploader for TextureStore {
    /// Decode the image file and upload it as an sRGB texture.
    fn upload(
        &mut self,
        path: &Path,
    ) -> Result<TextureHandle, TextureLoadError> {
        let decoded = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => TextureLoadError::Io(io),
            other => TextureLoadError::Decode(other),
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        let label = path.to_string_lossy();
        let handle = self.upload_rgba(&label, width, height, rgba.as_raw());
        log::debug!("uploaded texture {} ({width}x{height})", path.display());
        Ok(handle)
    }
}
