//! # Mesh: CPU-Side Geometry
//!
//! Every shape the demos draw ends up as a [`Mesh`]: a vertex list, an
//! optional index list and the primitive topology that ties them together.
//! Procedural shapes come from [`sphere`] and [`revolution`]; loaded models
//! come from [`assets::model`](crate::assets::model).
//!
//! ## Memoization
//!
//! Tessellation resolution never changes while a demo runs, so each shape is
//! built at most once. [`MeshLibrary`] holds one lazily initialised slot per
//! shape kind; the first request builds the mesh and every later request
//! gets the same allocation back.
//!
//! ```text
//! MeshLibrary
//! ├── sphere:   OnceCell<Mesh>   (strip, indexed)
//! ├── cylinder: OnceCell<Mesh>   (list, non-indexed)
//! └── model:    OnceCell<Mesh>   (list, indexed, set by the loader)
//! ```

pub mod revolution;
pub mod sphere;

use std::cell::OnceCell;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use revolution::Profile;

/// Per-vertex data: position, surface normal and texture UV (32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// How consecutive indices (or vertices) form triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Each new index forms a triangle with the previous two.
    TriangleStrip,
    /// Every three indices form an independent triangle.
    TriangleList,
}

/// Which shape the instance grid is drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Sphere,
    Cylinder,
    /// The externally loaded model. Collapses the grid to a single instance.
    Model,
}

impl ShapeKind {
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Model => "custom",
        }
    }

    /// Procedural shapes are tessellated on demand; the model is loaded.
    pub fn is_procedural(self) -> bool {
        !matches!(self, ShapeKind::Model)
    }
}

/// Immutable geometry ready for GPU upload.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<MeshVertex>,
    indices: Option<Vec<u32>>,
    topology: Topology,
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>, indices: Option<Vec<u32>>, topology: Topology) -> Self {
        let mesh = Self {
            vertices,
            indices,
            topology,
        };
        debug_assert!(mesh.indices_in_range(), "mesh index out of range");
        mesh
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of elements a draw call consumes: indices if present, else vertices.
    pub fn draw_count(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.len() as u32,
            None => self.vertices.len() as u32,
        }
    }

    /// True when every index addresses an existing vertex.
    pub fn indices_in_range(&self) -> bool {
        let count = self.vertices.len();
        self.indices
            .as_ref()
            .is_none_or(|indices| indices.iter().all(|&i| (i as usize) < count))
    }
}

/// Lazily built, process-lifetime cache of every shape the demos draw.
pub struct MeshLibrary {
    sphere_segments: u32,
    profile: Profile,
    sphere: OnceCell<Mesh>,
    cylinder: OnceCell<Mesh>,
    model: OnceCell<Mesh>,
}

impl MeshLibrary {
    pub fn new(sphere_segments: u32, profile: Profile) -> Self {
        Self {
            sphere_segments,
            profile,
            sphere: OnceCell::new(),
            cylinder: OnceCell::new(),
            model: OnceCell::new(),
        }
    }

    pub fn sphere(&self) -> &Mesh {
        self.sphere.get_or_init(|| {
            log::debug!("tessellating sphere ({} segments)", self.sphere_segments);
            sphere::generate(self.sphere_segments)
        })
    }

    pub fn cylinder(&self) -> &Mesh {
        self.cylinder.get_or_init(|| {
            log::debug!(
                "tessellating surface of revolution ({}x{} cells)",
                self.profile.div_u(),
                self.profile.div_t()
            );
            revolution::generate(&self.profile)
        })
    }

    /// Install the loaded model. Returns `false` if one was already installed.
    pub fn set_model(&self, mesh: Mesh) -> bool {
        self.model.set(mesh).is_ok()
    }

    pub fn model(&self) -> Option<&Mesh> {
        self.model.get()
    }

    /// Fetch (building on first use) the mesh for `kind`. `None` only for a
    /// model that was never loaded.
    pub fn get(&self, kind: ShapeKind) -> Option<&Mesh> {
        match kind {
            ShapeKind::Sphere => Some(self.sphere()),
            ShapeKind::Cylinder => Some(self.cylinder()),
            ShapeKind::Model => self.model(),
        }
    }

    /// Whether the slot for `kind` has been populated yet.
    pub fn is_built(&self, kind: ShapeKind) -> bool {
        match kind {
            ShapeKind::Sphere => self.sphere.get().is_some(),
            ShapeKind::Cylinder => self.cylinder.get().is_some(),
            ShapeKind::Model => self.model.get().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> MeshLibrary {
        MeshLibrary::new(8, Profile::cylinder())
    }

    #[test]
    fn mesh_vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
    }

    #[test]
    fn shapes_are_built_lazily() {
        let lib = library();
        assert!(!lib.is_built(ShapeKind::Sphere));
        assert!(!lib.is_built(ShapeKind::Cylinder));
        lib.sphere();
        assert!(lib.is_built(ShapeKind::Sphere));
        assert!(!lib.is_built(ShapeKind::Cylinder));
    }

    #[test]
    fn repeated_requests_return_the_same_mesh() {
        let lib = library();
        let first = lib.sphere() as *const Mesh;
        let second = lib.get(ShapeKind::Sphere).unwrap() as *const Mesh;
        assert_eq!(first, second);

        let first = lib.cylinder().vertices().as_ptr();
        let second = lib.cylinder().vertices().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn model_slot_is_set_once() {
        let lib = library();
        assert!(lib.get(ShapeKind::Model).is_none());
        let tri = Mesh::new(
            vec![MeshVertex::zeroed(); 3],
            Some(vec![0, 1, 2]),
            Topology::TriangleList,
        );
        assert!(lib.set_model(tri.clone()));
        assert!(!lib.set_model(tri));
        assert_eq!(lib.model().unwrap().draw_count(), 3);
    }

    #[test]
    fn index_range_check() {
        let mesh = Mesh {
            vertices: vec![MeshVertex::zeroed(); 2],
            indices: Some(vec![0, 1, 2]),
            topology: Topology::TriangleList,
        };
        assert!(!mesh.indices_in_range());
    }

    #[test]
    fn draw_count_falls_back_to_vertices() {
        let mesh = Mesh::new(vec![MeshVertex::zeroed(); 6], None, Topology::TriangleList);
        assert_eq!(mesh.draw_count(), 6);
    }
}
