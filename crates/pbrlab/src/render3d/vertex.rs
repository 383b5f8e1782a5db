//! # Vertex Layout and Uniform Blocks
//!
//! ```text
//! MeshVertex (32 bytes)
//! ┌──────────────┬──────────────┬──────────────┐
//! │ position     │ normal       │ uv           │
//! │ offset 0     │ offset 12    │ offset 24    │
//! │ location(0)  │ location(1)  │ location(2)  │
//! └──────────────┴──────────────┴──────────────┘
//! ```
//!
//! Uniform groups, ordered by how often they change:
//!
//! ```text
//! Group 0  CameraUniform         80 bytes   per frame
//! Group 1  LightUniform         272 bytes   per frame
//!          ShadingUniform        32 bytes   per frame
//! Group 2  five maps + sampler              per texture set
//! Group 3  InstanceUniform      160 bytes   per draw, dynamic offset
//! ```
//!
//! Field order and padding must match the structs in `shader.wgsl`.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::lights::{Light, MAX_LIGHTS};
use crate::mesh::MeshVertex;
use crate::shading::{InstanceMaterial, ShadingParams, clamp_roughness};

impl MeshVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };
}

/// View-projection matrix plus eye position for the specular term.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn new(view_proj: Mat4, position: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            position: position.to_array(),
            _padding: 0.0,
        }
    }
}

/// Up to [`MAX_LIGHTS`] point lights. `w` is unused in both arrays.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LightUniform {
    pub positions: [[f32; 4]; MAX_LIGHTS],
    pub colors: [[f32; 4]; MAX_LIGHTS],
    pub count: u32,
    pub _pad: [u32; 3],
}

impl LightUniform {
    /// Extra lights past [`MAX_LIGHTS`] are dropped.
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut uniform = Self::zeroed();
        for (i, light) in lights.iter().take(MAX_LIGHTS).enumerate() {
            uniform.positions[i] = light.position.extend(1.0).to_array();
            uniform.colors[i] = light.color.extend(1.0).to_array();
        }
        uniform.count = lights.len().min(MAX_LIGHTS) as u32;
        uniform
    }
}

/// Global shading switches. Booleans travel as `0`/`1`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShadingUniform {
    pub ambient: f32,
    pub f0: f32,
    pub fresnel: u32,
    pub ndf: u32,
    pub geometry: u32,
    pub tone_map: u32,
    pub diffuse: u32,
    pub specular: u32,
}

impl From<&ShadingParams> for ShadingUniform {
    fn from(params: &ShadingParams) -> Self {
        Self {
            ambient: params.ambient,
            f0: params.f0,
            fresnel: params.fresnel.shader_code(),
            ndf: params.ndf.shader_code(),
            geometry: params.geometry.shader_code(),
            tone_map: params.tone_map as u32,
            diffuse: params.diffuse as u32,
            specular: params.specular as u32,
        }
    }
}

/// Per-draw transform and material, bound with a dynamic offset.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct InstanceUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`; the shader uses the upper 3x3.
    pub normal_matrix: [[f32; 4]; 4],
    pub albedo: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    pub ao: f32,
    pub textured: u32,
}

impl InstanceUniform {
    pub fn new(transform: Mat4, material: &InstanceMaterial) -> Self {
        let [r, g, b] = material.albedo;
        Self {
            model: transform.to_cols_array_2d(),
            normal_matrix: transform.inverse().transpose().to_cols_array_2d(),
            albedo: [r, g, b, 1.0],
            metallic: material.metallic,
            roughness: clamp_roughness(material.roughness),
            ao: material.ao,
            textured: material.texture_set.is_some() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::*;
    use crate::shading::{GeometryTerm, NormalDistribution, TextureSetId};

    #[test]
    fn uniform_sizes_match_wgsl() {
        assert_eq!(size_of::<MeshVertex>(), 32);
        assert_eq!(size_of::<CameraUniform>(), 80);
        assert_eq!(size_of::<LightUniform>(), 272);
        assert_eq!(size_of::<ShadingUniform>(), 32);
        assert_eq!(size_of::<InstanceUniform>(), 160);
    }

    #[test]
    fn light_uniform_packs_in_order() {
        let lights = [
            Light {
                base: Vec3::X,
                position: Vec3::new(1.0, 2.0, 3.0),
                color: Vec3::splat(300.0),
            },
            Light {
                base: Vec3::Y,
                position: Vec3::new(-1.0, 0.0, 10.0),
                color: Vec3::ZERO,
            },
        ];
        let uniform = LightUniform::from_lights(&lights);
        assert_eq!(uniform.count, 2);
        assert_eq!(uniform.positions[0], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.colors[0], [300.0, 300.0, 300.0, 1.0]);
        assert_eq!(uniform.positions[1], [-1.0, 0.0, 10.0, 1.0]);
        assert_eq!(uniform.positions[2], [0.0; 4]);
    }

    #[test]
    fn shading_uniform_encodes_selectors() {
        let mut params = ShadingParams::default();
        params.ndf = NormalDistribution::Off;
        params.geometry = GeometryTerm::Kelemen;
        params.tone_map = false;
        let uniform = ShadingUniform::from(&params);
        assert_eq!(uniform.ndf, 2);
        assert_eq!(uniform.geometry, 1);
        assert_eq!(uniform.tone_map, 0);
        assert_eq!(uniform.diffuse, 1);
        assert_eq!(uniform.ambient, ShadingParams::DEFAULT_AMBIENT);
    }

    #[test]
    fn instance_uniform_clamps_roughness() {
        let material = InstanceMaterial {
            albedo: [0.5, 0.0, 0.0],
            metallic: 1.0,
            roughness: 0.0,
            ao: 1.0,
            texture_set: None,
        };
        let uniform = InstanceUniform::new(Mat4::IDENTITY, &material);
        assert_eq!(uniform.roughness, crate::shading::MIN_ROUGHNESS);
        assert_eq!(uniform.textured, 0);
        assert_eq!(uniform.albedo, [0.5, 0.0, 0.0, 1.0]);

        let textured = InstanceUniform::new(
            Mat4::IDENTITY,
            &InstanceMaterial::textured(TextureSetId::Model),
        );
        assert_eq!(textured.textured, 1);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let transform = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let uniform = InstanceUniform::new(transform, &InstanceMaterial::marker());
        let normal = Mat4::from_cols_array_2d(&uniform.normal_matrix);
        assert!((normal.x_axis.x - 0.5).abs() < 1e-6);
        assert!((normal.y_axis.y - 1.0).abs() < 1e-6);
    }
}
