//! Scene pass: upload per-frame uniforms and draw the instance list.

use glam::Mat4;

use super::mesh::GpuMeshStore;
use super::pipeline::{PbrRenderer, SHADER_SOURCE};
use super::texture::{TextureCatalog, TextureStore};
use super::vertex::{CameraUniform, InstanceUniform, LightUniform, ShadingUniform};
use crate::error::RenderError;
use crate::mesh::{MeshLibrary, ShapeKind};
use crate::render::{ClearColor, FrameContext, GpuContext};
use crate::shading::InstanceMaterial;

/// One shape instance to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub shape: ShapeKind,
    pub transform: Mat4,
    pub material: InstanceMaterial,
}

/// Uniform data shared by every draw of a frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameUniforms {
    pub camera: CameraUniform,
    pub lights: LightUniform,
    pub shading: ShadingUniform,
}

/// Owns every GPU resource of the scene pass.
pub struct SceneRenderer {
    pbr: PbrRenderer,
    meshes: GpuMeshStore,
    textures: TextureStore,
    clear_color: ClearColor,
}

impl SceneRenderer {
    /// `shader_source` is the WGSL to start with, usually the watched file's
    /// contents or [`SHADER_SOURCE`].
    pub fn new(gpu: &GpuContext, clear_color: ClearColor, shader_source: Option<&str>) -> Self {
        let pbr = PbrRenderer::new(gpu, shader_source.unwrap_or(SHADER_SOURCE));
        let textures = TextureStore::new(gpu, &pbr.material_layout, &pbr.sampler);
        Self {
            pbr,
            meshes: GpuMeshStore::default(),
            textures,
            clear_color,
        }
    }

    /// Record the scene pass into `frame.encoder`.
    pub fn render(
        &mut self,
        frame: &mut FrameContext<'_>,
        uniforms: &FrameUniforms,
        items: &[DrawItem],
        library: &MeshLibrary,
        catalog: &TextureCatalog,
    ) {
        let gpu = frame.gpu;

        // ── 1. Depth check ──────────────────────────────────────────────
        let (sw, sh) = gpu.surface_size();
        self.pbr.resize_depth_if_needed(&gpu.device, sw, sh);

        // ── 2. Frame uniforms ───────────────────────────────────────────
        gpu.queue
            .write_buffer(&self.pbr.camera_buffer, 0, bytemuck::bytes_of(&uniforms.camera));
        gpu.queue
            .write_buffer(&self.pbr.light_buffer, 0, bytemuck::bytes_of(&uniforms.lights));
        gpu.queue
            .write_buffer(&self.pbr.shading_buffer, 0, bytemuck::bytes_of(&uniforms.shading));

        // ── 3. Make sure every mesh and texture set is resident ─────────
        let mut drawable = Vec::with_capacity(items.len());
        for item in items {
            if !self.meshes.ensure(gpu, item.shape, library) {
                continue;
            }
            if let Some(set) = item.material.texture_set {
                self.textures.ensure(
                    gpu,
                    &self.pbr.material_layout,
                    &self.pbr.sampler,
                    set,
                    catalog,
                );
            }
            drawable.push(item);
        }

        // ── 4. Instance uniforms into the dynamic buffer ────────────────
        let stride = if drawable.is_empty() {
            0
        } else {
            let stride = self.pbr.ensure_instance_capacity(&gpu.device, drawable.len());
            let mut data = vec![0u8; stride as usize * drawable.len()];
            for (i, item) in drawable.iter().enumerate() {
                let offset = i * stride as usize;
                let uniform = InstanceUniform::new(item.transform, &item.material);
                let bytes = bytemuck::bytes_of(&uniform);
                data[offset..offset + bytes.len()].copy_from_slice(bytes);
            }
            gpu.queue.write_buffer(&self.pbr.instance_buffer, 0, &data);
            stride
        };

        // ── 5. Render pass ──────────────────────────────────────────────
        let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pbr scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.pbr.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.pbr.camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.pbr.lighting_bind_group, &[]);

        for (i, item) in drawable.iter().enumerate() {
            let Some(mesh) = self.meshes.get(item.shape) else {
                continue;
            };
            render_pass.set_pipeline(self.pbr.pipeline(mesh.topology));
            render_pass.set_bind_group(2, self.textures.bind_group(item.material.texture_set), &[]);
            render_pass.set_bind_group(3, &self.pbr.instance_bind_group, &[i as u32 * stride]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            match &mesh.index_buffer {
                Some(indices) => {
                    render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..mesh.draw_count, 0, 0..1);
                }
                None => render_pass.draw(0..mesh.draw_count, 0..1),
            }
        }
    }

    /// Compile `source` and swap it in if validation passes. On failure the
    /// old pipelines stay.
    pub fn reload_shader(&mut self, gpu: &GpuContext, source: &str) -> Result<(), RenderError> {
        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("pbr shader (hot-reload)"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let (strip, list) = self.pbr.build_pipelines(gpu, &shader);

        match pollster::block_on(gpu.device.pop_error_scope()) {
            Some(err) => Err(RenderError::Shader {
                message: err.to_string(),
            }),
            None => {
                self.pbr.strip_pipeline = strip;
                self.pbr.list_pipeline = list;
                Ok(())
            }
        }
    }
}
