//! PBR texture sets on the GPU.
//!
//! A set is five maps bound together in group 2. Sets are decoded and
//! uploaded the first time an instance needs them, then kept for the rest
//! of the run. Untextured draws bind a fallback set whose values the shader
//! ignores.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::pipeline::MAP_BINDINGS;
use crate::assets::{DecodedImage, load_or_placeholder};
use crate::config::TextureSetConfig;
use crate::render::GpuContext;
use crate::shading::TextureSetId;

/// One of the five maps in a texture set, in binding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Albedo,
    Normal,
    Metallic,
    Roughness,
    Ao,
}

impl MapKind {
    pub const ALL: [MapKind; 5] = [
        MapKind::Albedo,
        MapKind::Normal,
        MapKind::Metallic,
        MapKind::Roughness,
        MapKind::Ao,
    ];

    /// Albedo is authored in sRGB; the others hold linear data.
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            MapKind::Albedo => wgpu::TextureFormat::Rgba8UnormSrgb,
            _ => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    /// 1x1 value bound when no set is selected.
    pub fn fallback_pixel(self) -> [u8; 4] {
        match self {
            // Tangent-space +Z.
            MapKind::Normal => [128, 128, 255, 255],
            _ => [255, 255, 255, 255],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapKind::Albedo => "albedo",
            MapKind::Normal => "normal",
            MapKind::Metallic => "metallic",
            MapKind::Roughness => "roughness",
            MapKind::Ao => "ao",
        }
    }
}

/// Resolves a [`TextureSetId`] to the files it is loaded from.
#[derive(Debug, Clone)]
pub struct TextureCatalog {
    library: Vec<TextureSetConfig>,
    model: TextureSetConfig,
}

impl TextureCatalog {
    pub fn new(library: Vec<TextureSetConfig>, model: TextureSetConfig) -> Self {
        Self { library, model }
    }

    pub fn get(&self, id: TextureSetId) -> Option<&TextureSetConfig> {
        match id {
            TextureSetId::Library(i) => self.library.get(i),
            TextureSetId::Model => Some(&self.model),
        }
    }

    pub fn library(&self) -> &[TextureSetConfig] {
        &self.library
    }
}

/// Uploaded texture sets, keyed by id.
pub struct TextureStore {
    fallback: wgpu::BindGroup,
    sets: HashMap<TextureSetId, wgpu::BindGroup>,
}

impl TextureStore {
    pub fn new(gpu: &GpuContext, layout: &wgpu::BindGroupLayout, sampler: &wgpu::Sampler) -> Self {
        let views = MapKind::ALL.map(|kind| {
            let pixel = kind.fallback_pixel();
            upload_map(gpu, kind, "fallback", 1, 1, &pixel)
        });
        Self {
            fallback: create_set_bind_group(gpu, layout, sampler, "fallback", &views),
            sets: HashMap::new(),
        }
    }

    pub fn is_loaded(&self, id: TextureSetId) -> bool {
        self.sets.contains_key(&id)
    }

    /// Decode and upload `id` unless it is already resident. Maps that fail
    /// to decode are replaced by the magenta placeholder.
    pub fn ensure(
        &mut self,
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        id: TextureSetId,
        catalog: &TextureCatalog,
    ) {
        if self.is_loaded(id) {
            return;
        }
        let Some(config) = catalog.get(id) else {
            log::warn!("no texture set configured for {id:?}");
            return;
        };

        let paths = config.paths();
        let views = MapKind::ALL.map(|kind| {
            let image: DecodedImage = load_or_placeholder(paths[kind as usize]);
            upload_map(gpu, kind, &config.name, image.width, image.height, &image.pixels)
        });
        let bind_group = create_set_bind_group(gpu, layout, sampler, &config.name, &views);
        log::info!("uploaded texture set '{}'", config.name);
        self.sets.insert(id, bind_group);
    }

    /// Bind group for `id`, or the fallback when it is `None` or not loaded.
    pub fn bind_group(&self, id: Option<TextureSetId>) -> &wgpu::BindGroup {
        id.and_then(|id| self.sets.get(&id)).unwrap_or(&self.fallback)
    }
}

fn upload_map(
    gpu: &GpuContext,
    kind: MapKind,
    set_name: &str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::TextureView {
    let label = format!("{set_name} {}", kind.label());
    let texture = gpu.device.create_texture_with_data(
        &gpu.queue,
        &wgpu::TextureDescriptor {
            label: Some(&label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: kind.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        pixels,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_set_bind_group(
    gpu: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    set_name: &str,
    views: &[wgpu::TextureView; 5],
) -> wgpu::BindGroup {
    let mut entries: Vec<wgpu::BindGroupEntry> = views
        .iter()
        .enumerate()
        .map(|(i, view)| wgpu::BindGroupEntry {
            binding: i as u32,
            resource: wgpu::BindingResource::TextureView(view),
        })
        .collect();
    entries.push(wgpu::BindGroupEntry {
        binding: MAP_BINDINGS,
        resource: wgpu::BindingResource::Sampler(sampler),
    });
    gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{set_name} texture set")),
        layout,
        entries: &entries,
    })
}
