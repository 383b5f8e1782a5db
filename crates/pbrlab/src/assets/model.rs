//! Model loading: OBJ through `tobj`, glTF/GLB through `gltf`.
//!
//! Only the first sub-mesh of a file is used. OBJ texture coordinates are
//! flipped vertically since OBJ puts `v = 0` at the bottom of the image and
//! wgpu samples with `v = 0` at the top. Missing normals are rebuilt by
//! averaging the face normals around each vertex.

use std::io::Cursor;
use std::path::Path;

use glam::Vec3;

use crate::error::AssetError;
use crate::mesh::{Mesh, MeshVertex, Topology};

fn obj_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Load the first mesh of `path`, picking the parser from the extension.
pub fn load_model(path: impl AsRef<Path>) -> Result<Mesh, AssetError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let mesh = match extension.as_deref() {
        Some("obj") => load_obj(path)?,
        Some("gltf" | "glb") => load_gltf(path)?,
        _ => {
            return Err(AssetError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    log::info!(
        "loaded model {} ({} vertices, {} indices)",
        path.display(),
        mesh.vertex_count(),
        mesh.draw_count()
    );
    Ok(mesh)
}

/// Read an OBJ file from disk. Materials are ignored.
pub fn load_obj(path: &Path) -> Result<Mesh, AssetError> {
    let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&text, path)
}

/// Parse OBJ source text; `path` is only used in error messages.
pub fn parse_obj(text: &str, path: &Path) -> Result<Mesh, AssetError> {
    let (models, _materials) = tobj::load_obj_buf(
        &mut Cursor::new(text.as_bytes()),
        &obj_options(),
        |_| Ok(Default::default()),
    )
    .map_err(|e| AssetError::ObjParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let first = models.into_iter().next().ok_or_else(|| AssetError::EmptyMesh {
        path: path.to_path_buf(),
    })?;
    let mesh = first.mesh;
    let count = mesh.positions.len() / 3;
    if count == 0 || mesh.indices.is_empty() {
        return Err(AssetError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }

    let positions: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let normals: Option<Vec<[f32; 3]>> = (mesh.normals.len() == count * 3)
        .then(|| mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect());
    let uvs: Option<Vec<[f32; 2]>> = (mesh.texcoords.len() == count * 2)
        .then(|| mesh.texcoords.chunks_exact(2).map(|t| [t[0], 1.0 - t[1]]).collect());

    build_mesh(positions, normals, uvs, mesh.indices, path)
}

/// Import the first primitive of the first mesh in a glTF/GLB file.
pub fn load_gltf(path: &Path) -> Result<Mesh, AssetError> {
    let (document, buffers, _images) = gltf::import(path).map_err(|e| AssetError::GltfImport {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let empty = || AssetError::EmptyMesh {
        path: path.to_path_buf(),
    };

    let primitive = document
        .meshes()
        .next()
        .and_then(|mesh| mesh.primitives().next())
        .ok_or_else(empty)?;
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader.read_positions().ok_or_else(empty)?.collect();
    let normals = reader.read_normals().map(|iter| iter.collect());
    let uvs = reader.read_tex_coords(0).map(|iter| iter.into_f32().collect());
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    build_mesh(positions, normals, uvs, indices, path)
}

fn build_mesh(
    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    uvs: Option<Vec<[f32; 2]>>,
    indices: Vec<u32>,
    path: &Path,
) -> Result<Mesh, AssetError> {
    let count = positions.len();
    if count == 0 || indices.len() < 3 || indices.iter().any(|&i| i as usize >= count) {
        return Err(AssetError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }

    let normals = match normals {
        Some(n) if n.len() == count => n,
        _ => smooth_normals(&positions, &indices),
    };
    let uvs = uvs
        .filter(|uv| uv.len() == count)
        .unwrap_or_else(|| vec![[0.0, 0.0]; count]);

    let vertices = positions
        .into_iter()
        .zip(normals)
        .zip(uvs)
        .map(|((position, normal), uv)| MeshVertex {
            position,
            normal,
            uv,
        })
        .collect();

    Ok(Mesh::new(vertices, Some(indices), Topology::TriangleList))
}

/// Area-weighted vertex normals from triangle faces.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(positions[i as usize]));
        let face = (b - a).cross(c - a);
        for &i in tri {
            acc[i as usize] += face;
        }
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}
