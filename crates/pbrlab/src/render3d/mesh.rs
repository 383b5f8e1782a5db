//! GPU buffers for the three drawable shapes.
//!
//! Each shape is uploaded the first time it is drawn. The CPU side lives in
//! [`MeshLibrary`]; this store only mirrors what has been requested so far.

use wgpu::util::DeviceExt;

use crate::mesh::{Mesh, MeshLibrary, ShapeKind, Topology};
use crate::render::GpuContext;

/// A mesh that has been uploaded to GPU buffers.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    /// `None` for non-indexed meshes, drawn with `draw` instead.
    pub index_buffer: Option<wgpu::Buffer>,
    pub draw_count: u32,
    pub topology: Topology,
}

impl GpuMesh {
    pub fn upload(gpu: &GpuContext, label: &str, mesh: &Mesh) -> Self {
        let vertex_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vertex buffer")),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = mesh.indices().map(|indices| {
            gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} index buffer")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });
        Self {
            vertex_buffer,
            index_buffer,
            draw_count: mesh.draw_count(),
            topology: mesh.topology(),
        }
    }
}

#[derive(Default)]
pub struct GpuMeshStore {
    sphere: Option<GpuMesh>,
    cylinder: Option<GpuMesh>,
    model: Option<GpuMesh>,
}

impl GpuMeshStore {
    fn slot(&mut self, kind: ShapeKind) -> &mut Option<GpuMesh> {
        match kind {
            ShapeKind::Sphere => &mut self.sphere,
            ShapeKind::Cylinder => &mut self.cylinder,
            ShapeKind::Model => &mut self.model,
        }
    }

    /// Upload `kind` from `library` if it is not resident yet. Returns
    /// `false` when the library has no mesh for it (no model loaded).
    pub fn ensure(&mut self, gpu: &GpuContext, kind: ShapeKind, library: &MeshLibrary) -> bool {
        let slot = self.slot(kind);
        if slot.is_some() {
            return true;
        }
        match library.get(kind) {
            Some(mesh) => {
                log::debug!(
                    "uploading {} mesh ({} vertices, {} draw count)",
                    kind.label(),
                    mesh.vertex_count(),
                    mesh.draw_count()
                );
                *slot = Some(GpuMesh::upload(gpu, kind.label(), mesh));
                true
            }
            None => false,
        }
    }

    pub fn get(&self, kind: ShapeKind) -> Option<&GpuMesh> {
        match kind {
            ShapeKind::Sphere => self.sphere.as_ref(),
            ShapeKind::Cylinder => self.cylinder.as_ref(),
            ShapeKind::Model => self.model.as_ref(),
        }
    }
}
