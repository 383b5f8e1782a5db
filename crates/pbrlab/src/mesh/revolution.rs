//! Surfaces of revolution.
//!
//! A [`Profile`] is a straight segment from control point `a` to control
//! point `b` in the XY half-plane, swept once around the Y axis. The segment
//! is parameterized by `u ∈ [0, 1]` and the sweep by `t ∈ [0, 1)`:
//!
//! ```text
//! R(u)    = a.x + u·(b.x - a.x)
//! Y(u)    = a.y + u·(b.y - a.y)
//! S(u, t) = (R(u)·sin 2πt, Y(u), R(u)·cos 2πt)
//! ```
//!
//! With `a.x == b.x` the result is an open cylinder. Normals are the radial
//! vector `pos - (0, pos.y, 0)`, which ignores the profile's slope. Cones and
//! frusta therefore light like cylinders; the demos only ever build straight
//! sided shapes.

use std::f32::consts::TAU;

use glam::Vec3;

use super::{Mesh, MeshVertex, Topology};
use crate::error::ProfileError;

/// Corner offsets `(di, dj)` of the two triangles covering one grid cell.
const CELL_CORNERS: [(u32, u32); 6] = [(0, 0), (1, 0), (1, 1), (0, 0), (1, 1), (0, 1)];

/// Linear profile swept around the Y axis, plus its tessellation resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile {
    a: Vec3,
    b: Vec3,
    div_u: u32,
    div_t: u32,
}

impl Profile {
    pub const CYLINDER_A: Vec3 = Vec3::new(1.0, 2.0, 0.0);
    pub const CYLINDER_B: Vec3 = Vec3::new(1.0, -2.0, 0.0);
    pub const CYLINDER_DIVISIONS: u32 = 64;

    /// Build a profile with `div_u` cells along the segment and `div_t` cells
    /// around the axis.
    pub fn new(a: Vec3, b: Vec3, div_u: u32, div_t: u32) -> Result<Self, ProfileError> {
        if a == b {
            return Err(ProfileError::CoincidentControlPoints);
        }
        if div_u == 0 || div_t == 0 {
            return Err(ProfileError::ZeroResolution);
        }
        Ok(Self { a, b, div_u, div_t })
    }

    /// Same resolution along both parametric axes.
    pub fn uniform(a: Vec3, b: Vec3, div: u32) -> Result<Self, ProfileError> {
        Self::new(a, b, div, div)
    }

    /// Radius 1, height 4 cylinder centered on the origin, 64x64 cells.
    pub fn cylinder() -> Self {
        Self {
            a: Self::CYLINDER_A,
            b: Self::CYLINDER_B,
            div_u: Self::CYLINDER_DIVISIONS,
            div_t: Self::CYLINDER_DIVISIONS,
        }
    }

    pub fn a(&self) -> Vec3 {
        self.a
    }

    pub fn b(&self) -> Vec3 {
        self.b
    }

    pub fn div_u(&self) -> u32 {
        self.div_u
    }

    pub fn div_t(&self) -> u32 {
        self.div_t
    }

    /// `R(u)`
    pub fn radius(&self, u: f32) -> f32 {
        self.a.x + u * (self.b.x - self.a.x)
    }

    /// `Y(u)`
    pub fn height(&self, u: f32) -> f32 {
        self.a.y + u * (self.b.y - self.a.y)
    }

    /// `S(u, t)`
    pub fn point(&self, u: f32, t: f32) -> Vec3 {
        let r = self.radius(u);
        let angle = TAU * t;
        Vec3::new(r * angle.sin(), self.height(u), r * angle.cos())
    }

    /// Vertices produced by [`generate`]: two triangles per cell.
    pub fn vertex_count(&self) -> usize {
        6 * self.div_u as usize * self.div_t as usize
    }
}

/// Tessellate `profile` into a non-indexed triangle list.
///
/// Cell `(i, j)` spans `u ∈ [i/div_u, (i+1)/div_u]` and
/// `t ∈ [j/div_t, (j+1)/div_t]` and is split as `{p00, p10, p11}` and
/// `{p00, p11, p01}`, which faces away from the axis.
pub fn generate(profile: &Profile) -> Mesh {
    let mut vertices = Vec::with_capacity(profile.vertex_count());
    let step_u = 1.0 / profile.div_u as f32;
    let step_t = 1.0 / profile.div_t as f32;

    for i in 0..profile.div_u {
        for j in 0..profile.div_t {
            for (di, dj) in CELL_CORNERS {
                let u = (i + di) as f32 * step_u;
                let t = (j + dj) as f32 * step_t;
                let p = profile.point(u, t);
                let normal = p - Vec3::new(0.0, p.y, 0.0);
                vertices.push(MeshVertex {
                    position: p.to_array(),
                    normal: normal.to_array(),
                    uv: [t, u],
                });
            }
        }
    }

    Mesh::new(vertices, None, Topology::TriangleList)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_is_six_per_cell() {
        for div in [1, 2, 3, 10, 64] {
            let profile = Profile::uniform(Profile::CYLINDER_A, Profile::CYLINDER_B, div).unwrap();
            let mesh = generate(&profile);
            assert_eq!(mesh.vertex_count(), 6 * (div * div) as usize);
            assert_eq!(mesh.topology(), Topology::TriangleList);
            assert!(mesh.indices().is_none());
        }
    }

    #[test]
    fn every_vertex_lies_on_the_surface() {
        let profile = Profile::uniform(Vec3::new(1.5, 1.0, 0.0), Vec3::new(0.5, -3.0, 0.0), 7).unwrap();
        let mesh = generate(&profile);
        let step = 1.0 / profile.div_u() as f32;

        for (k, v) in mesh.vertices().iter().enumerate() {
            let cell = k as u32 / 6;
            let (di, dj) = CELL_CORNERS[k % 6];
            let i = cell / profile.div_t();
            let j = cell % profile.div_t();
            let u = (i + di) as f32 * step;
            let t = (j + dj) as f32 * step;

            let r = profile.radius(u);
            let expected = Vec3::new(r * (TAU * t).sin(), profile.height(u), r * (TAU * t).cos());
            assert!((Vec3::from(v.position) - expected).length() < 1e-5, "vertex {k}");
            assert_eq!(v.uv, [t, u]);
        }
    }

    #[test]
    fn normals_are_radial() {
        let mesh = generate(&Profile::cylinder());
        for v in mesh.vertices() {
            assert_eq!(v.normal[1], 0.0);
            assert_eq!(v.normal[0], v.position[0]);
            assert_eq!(v.normal[2], v.position[2]);
        }
    }

    #[test]
    fn cylinder_triangles_face_outward() {
        let mesh = generate(&Profile::uniform(Profile::CYLINDER_A, Profile::CYLINDER_B, 16).unwrap());
        for tri in mesh.vertices().chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| Vec3::from(v.position));
            let face = (b - a).cross(c - a);
            let radial = (a + b + c) / 3.0 * Vec3::new(1.0, 0.0, 1.0);
            assert!(face.dot(radial) > 0.0);
        }
    }

    #[test]
    fn default_cylinder_dimensions() {
        let profile = Profile::cylinder();
        assert_eq!(profile.radius(0.0), 1.0);
        assert_eq!(profile.radius(1.0), 1.0);
        assert_eq!(profile.height(0.0), 2.0);
        assert_eq!(profile.height(1.0), -2.0);
        assert_eq!(profile.vertex_count(), 6 * 64 * 64);
    }

    #[test]
    fn rejects_degenerate_profiles() {
        let p = Vec3::new(1.0, 1.0, 0.0);
        assert_eq!(Profile::uniform(p, p, 8), Err(ProfileError::CoincidentControlPoints));
        assert_eq!(
            Profile::new(Profile::CYLINDER_A, Profile::CYLINDER_B, 0, 4),
            Err(ProfileError::ZeroResolution)
        );
        assert_eq!(
            Profile::new(Profile::CYLINDER_A, Profile::CYLINDER_B, 4, 0),
            Err(ProfileError::ZeroResolution)
        );
    }

    #[test]
    fn separate_resolutions() {
        let profile = Profile::new(Profile::CYLINDER_A, Profile::CYLINDER_B, 3, 5).unwrap();
        assert_eq!(generate(&profile).vertex_count(), 6 * 15);
    }
}
