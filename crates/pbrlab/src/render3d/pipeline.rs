//! # Pipeline: PBR Render Pipelines and Shared GPU Resources
//!
//! Two pipelines share one shader and one pipeline layout:
//!
//! - **strip**: `TriangleStrip` with `Uint32` strip indices, used by the
//!   procedural sphere.
//! - **list**: `TriangleList`, used by the cylinder and loaded models.
//!
//! Culling is off. The cylinder is open at both ends and loaded models come
//! with whatever winding the exporter picked, so both faces are shaded.
//!
//! Group 3 uses a dynamic offset: one buffer holds every [`InstanceUniform`]
//! of the frame, and each draw call passes its byte offset.

use std::mem::size_of;

use wgpu::util::DeviceExt;

use super::vertex::{CameraUniform, InstanceUniform, LightUniform, ShadingUniform};
use crate::mesh::{MeshVertex, Topology};
use crate::render::GpuContext;

/// Depth texture format used by the scene pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Embedded copy of the shader, used when no file is watched.
pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");

const INITIAL_INSTANCE_CAPACITY: usize = 64;

/// Texture bindings in group 2, in binding order.
pub const MAP_BINDINGS: u32 = 5;

pub struct PbrRenderer {
    pub strip_pipeline: wgpu::RenderPipeline,
    pub list_pipeline: wgpu::RenderPipeline,

    pub camera_layout: wgpu::BindGroupLayout,
    pub lighting_layout: wgpu::BindGroupLayout,
    pub material_layout: wgpu::BindGroupLayout,
    pub instance_layout: wgpu::BindGroupLayout,

    pub camera_buffer: wgpu::Buffer,
    pub camera_bind_group: wgpu::BindGroup,
    pub light_buffer: wgpu::Buffer,
    pub shading_buffer: wgpu::Buffer,
    pub lighting_bind_group: wgpu::BindGroup,

    pub sampler: wgpu::Sampler,

    pub depth_texture: wgpu::TextureView,
    pub depth_size: (u32, u32),

    pub instance_buffer: wgpu::Buffer,
    pub instance_bind_group: wgpu::BindGroup,
    /// Number of [`InstanceUniform`] slots in `instance_buffer`.
    pub instance_capacity: usize,
}

impl PbrRenderer {
    pub fn new(gpu: &GpuContext, shader_source: &str) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pbr shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        // ── Group 0: camera ─────────────────────────────────────────────
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pbr camera layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT, false, None)],
        });

        // ── Group 1: lights + shading switches ──────────────────────────
        let lighting_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pbr lighting layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT, false, None),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT, false, None),
            ],
        });

        // ── Group 2: albedo, normal, metallic, roughness, ao + sampler ──
        let mut material_entries: Vec<wgpu::BindGroupLayoutEntry> = (0..MAP_BINDINGS)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            })
            .collect();
        material_entries.push(wgpu::BindGroupLayoutEntry {
            binding: MAP_BINDINGS,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pbr material layout"),
            entries: &material_entries,
        });

        // ── Group 3: per-instance, dynamic offset ───────────────────────
        let instance_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pbr instance layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                true,
                wgpu::BufferSize::new(size_of::<InstanceUniform>() as u64),
            )],
        });

        let (strip_pipeline, list_pipeline) = create_pipelines(
            device,
            gpu.surface_format(),
            [&camera_layout, &lighting_layout, &material_layout, &instance_layout],
            &shader,
        );

        // ── Per-frame buffers ───────────────────────────────────────────
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pbr camera buffer"),
            contents: bytemuck::bytes_of(&CameraUniform::new(glam::Mat4::IDENTITY, glam::Vec3::ZERO)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pbr camera bind group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pbr light buffer"),
            contents: bytemuck::bytes_of(&LightUniform::from_lights(&[])),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shading_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pbr shading buffer"),
            contents: bytemuck::bytes_of(&ShadingUniform::from(&crate::shading::ShadingParams::default())),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lighting_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pbr lighting bind group"),
            layout: &lighting_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: light_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shading_buffer.as_entire_binding(),
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pbr map sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let (w, h) = gpu.surface_size();
        let depth_texture = create_depth_texture(device, w, h);

        let (instance_buffer, instance_bind_group) =
            create_instance_buffer(device, &instance_layout, INITIAL_INSTANCE_CAPACITY);

        Self {
            strip_pipeline,
            list_pipeline,
            camera_layout,
            lighting_layout,
            material_layout,
            instance_layout,
            camera_buffer,
            camera_bind_group,
            light_buffer,
            shading_buffer,
            lighting_bind_group,
            sampler,
            depth_texture,
            depth_size: (w, h),
            instance_buffer,
            instance_bind_group,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
        }
    }

    pub fn pipeline(&self, topology: Topology) -> &wgpu::RenderPipeline {
        match topology {
            Topology::TriangleStrip => &self.strip_pipeline,
            Topology::TriangleList => &self.list_pipeline,
        }
    }

    /// Recreate the depth texture if the surface size changed.
    pub fn resize_depth_if_needed(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if (width, height) != self.depth_size && width > 0 && height > 0 {
            self.depth_texture = create_depth_texture(device, width, height);
            self.depth_size = (width, height);
        }
    }

    /// Ensure the instance buffer can hold `count` entries. Returns the
    /// aligned stride in bytes.
    pub fn ensure_instance_capacity(&mut self, device: &wgpu::Device, count: usize) -> u32 {
        let stride = instance_stride(device);
        if count > self.instance_capacity {
            let new_cap = count.next_power_of_two();
            let (buffer, bind_group) = create_instance_buffer(device, &self.instance_layout, new_cap);
            self.instance_buffer = buffer;
            self.instance_bind_group = bind_group;
            self.instance_capacity = new_cap;
            log::debug!("instance buffer grown to {new_cap} slots");
        }
        stride as u32
    }

    /// Build candidate pipelines from a reloaded shader module.
    ///
    /// Nothing is swapped in here; the caller checks the error scope first.
    pub fn build_pipelines(
        &self,
        gpu: &GpuContext,
        shader: &wgpu::ShaderModule,
    ) -> (wgpu::RenderPipeline, wgpu::RenderPipeline) {
        create_pipelines(
            &gpu.device,
            gpu.surface_format(),
            [
                &self.camera_layout,
                &self.lighting_layout,
                &self.material_layout,
                &self.instance_layout,
            ],
            shader,
        )
    }
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    has_dynamic_offset: bool,
    min_binding_size: Option<wgpu::BufferSize>,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset,
            min_binding_size,
        },
        count: None,
    }
}

/// Strip and list pipelines over the same layout and shader.
fn create_pipelines(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    layouts: [&wgpu::BindGroupLayout; 4],
    shader: &wgpu::ShaderModule,
) -> (wgpu::RenderPipeline, wgpu::RenderPipeline) {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pbr pipeline layout"),
        bind_group_layouts: &layouts,
        push_constant_ranges: &[],
    });

    let build = |label: &str, topology: wgpu::PrimitiveTopology, strip_index_format| {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    };

    let strip = build(
        "pbr strip pipeline",
        wgpu::PrimitiveTopology::TriangleStrip,
        Some(wgpu::IndexFormat::Uint32),
    );
    let list = build("pbr list pipeline", wgpu::PrimitiveTopology::TriangleList, None);
    (strip, list)
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("pbr depth texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn instance_stride(device: &wgpu::Device) -> usize {
    let align = device.limits().min_uniform_buffer_offset_alignment as usize;
    align_up(size_of::<InstanceUniform>(), align)
}

fn create_instance_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let size = (instance_stride(device) * capacity) as u64;

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("pbr instance dynamic buffer"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("pbr instance bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(size_of::<InstanceUniform>() as u64),
            }),
        }],
    });

    (buffer, bind_group)
}

/// Round `value` up to the next multiple of `align` (a power of two).
pub fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_power_of_two() {
        assert_eq!(align_up(160, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(160, 32), 160);
        assert_eq!(align_up(0, 64), 0);
    }

    #[test]
    fn embedded_shader_declares_entry_points() {
        assert!(SHADER_SOURCE.contains("fn vs_main"));
        assert!(SHADER_SOURCE.contains("fn fs_main"));
        assert!(SHADER_SOURCE.contains("@group(3) @binding(0)"));
    }
}
