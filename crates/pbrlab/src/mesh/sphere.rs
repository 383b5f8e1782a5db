//! Unit sphere as a single indexed triangle strip.
//!
//! Vertices sit on an `(N+1) x (N+1)` grid of longitude `x` and latitude `y`,
//! stored `x`-major so vertex `(x, y)` lives at index `x*(N+1)+y`. Column
//! `y = 0` is the north pole and `y = N` the south pole; longitude `N` repeats
//! longitude `0` so the texture seam gets its own UVs.
//!
//! The strip walks one band of longitude at a time and reverses direction on
//! every odd band. Because each reversal happens at a pole, where every
//! vertex of the band shares the same position, the triangles stitching two
//! bands together have zero area and the whole sphere is one draw call with
//! no extra degenerate indices.

use std::f32::consts::PI;

use super::{Mesh, MeshVertex, Topology};

/// Tessellate a unit sphere with `segments` divisions in both directions.
///
/// `segments` below 1 is treated as 1.
pub fn generate(segments: u32) -> Mesh {
    let n = segments.max(1);
    let stride = n + 1;
    let mut vertices = Vec::with_capacity((stride * stride) as usize);

    for x in 0..=n {
        for y in 0..=n {
            let x_seg = x as f32 / n as f32;
            let y_seg = y as f32 / n as f32;
            let position = [
                (x_seg * 2.0 * PI).cos() * (y_seg * PI).sin(),
                (y_seg * PI).cos(),
                (x_seg * 2.0 * PI).sin() * (y_seg * PI).sin(),
            ];
            vertices.push(MeshVertex {
                position,
                // Unit sphere: the position is the outward normal.
                normal: position,
                uv: [x_seg, y_seg],
            });
        }
    }

    let mut indices = Vec::with_capacity((n * 2 * stride) as usize);
    for row in 0..n {
        if row % 2 == 0 {
            for k in 0..=n {
                indices.push(row * stride + k);
                indices.push((row + 1) * stride + k);
            }
        } else {
            for k in (0..=n).rev() {
                indices.push((row + 1) * stride + k);
                indices.push(row * stride + k);
            }
        }
    }

    Mesh::new(vertices, Some(indices), Topology::TriangleStrip)
}

/// Expand a triangle strip into its triangles, applying the alternating
/// winding flip the rasterizer uses. Triangles that repeat an index are
/// skipped since the GPU discards them.
pub fn strip_triangles(indices: &[u32]) -> Vec<[u32; 3]> {
    indices
        .windows(3)
        .enumerate()
        .filter_map(|(k, w)| {
            let tri = if k % 2 == 0 {
                [w[0], w[1], w[2]]
            } else {
                [w[1], w[0], w[2]]
            };
            let distinct = tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2];
            distinct.then_some(tri)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use glam::Vec3;

    use super::*;

    fn pos(mesh: &Mesh, i: u32) -> Vec3 {
        Vec3::from(mesh.vertices()[i as usize].position)
    }

    #[test]
    fn vertex_count_is_grid_squared() {
        for n in [1, 2, 3, 7, 16, 64] {
            let mesh = generate(n);
            assert_eq!(mesh.vertex_count(), ((n + 1) * (n + 1)) as usize);
            assert_eq!(mesh.topology(), Topology::TriangleStrip);
            assert!(mesh.indices_in_range());
        }
    }

    #[test]
    fn first_vertex_is_north_pole() {
        let mesh = generate(64);
        let v = mesh.vertices()[0];
        assert!((Vec3::from(v.position) - Vec3::Y).length() < 1e-6);
        assert_eq!(v.uv, [0.0, 0.0]);
    }

    #[test]
    fn positions_are_unit_and_normals_match() {
        let mesh = generate(16);
        for v in mesh.vertices() {
            let p = Vec3::from(v.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(v.position, v.normal);
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn vertex_index_matches_grid_coordinates() {
        let n = 8u32;
        let mesh = generate(n);
        for x in 0..=n {
            for y in 0..=n {
                let v = mesh.vertices()[(x * (n + 1) + y) as usize];
                assert_eq!(v.uv, [x as f32 / n as f32, y as f32 / n as f32]);
            }
        }
    }

    #[test]
    fn strip_covers_every_quad_exactly_twice() {
        for n in [1u32, 2, 5, 16, 64] {
            let mesh = generate(n);
            let stride = n + 1;
            let mut per_quad: HashMap<(u32, u32), u32> = HashMap::new();

            for tri in strip_triangles(mesh.indices().unwrap()) {
                let xs = tri.map(|i| i / stride);
                let ys = tri.map(|i| i % stride);
                let (x0, x1) = (*xs.iter().min().unwrap(), *xs.iter().max().unwrap());
                let (y0, y1) = (*ys.iter().min().unwrap(), *ys.iter().max().unwrap());

                if x1 - x0 <= 1 && y1 - y0 <= 1 {
                    *per_quad.entry((x0, y0)).or_default() += 1;
                } else {
                    // Band joins happen at a pole and must have zero area.
                    let [a, b, c] = tri.map(|i| pos(&mesh, i));
                    assert!((b - a).cross(c - a).length() < 1e-5, "visible seam triangle {tri:?}");
                }
            }

            assert_eq!(per_quad.len(), (n * n) as usize, "n = {n}");
            assert!(per_quad.values().all(|&count| count == 2), "n = {n}");
        }
    }

    #[test]
    fn strip_winds_outward() {
        for n in [1u32, 2, 3, 4, 8, 16, 64] {
            let mesh = generate(n);
            let mut checked = 0;
            for tri in strip_triangles(mesh.indices().unwrap()) {
                let [a, b, c] = tri.map(|i| pos(&mesh, i));
                let face_normal = (b - a).cross(c - a);
                if face_normal.length() < 1e-6 {
                    continue;
                }
                // Planes through the center (every triangle at n <= 2) have
                // no inside or outside.
                if face_normal.normalize().dot(a).abs() < 1e-5 {
                    continue;
                }
                let centroid = (a + b + c) / 3.0;
                assert!(face_normal.dot(centroid) > 0.0, "inward triangle {tri:?} at n = {n}");
                checked += 1;
            }
            if n >= 3 {
                assert!(checked > 0, "n = {n}");
            }
        }
    }

    #[test]
    fn zero_segments_is_clamped() {
        let mesh = generate(0);
        let one = generate(1);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), one.indices());
        assert!(mesh.indices_in_range());
        assert_eq!(mesh.draw_count(), 4);
        assert!(!strip_triangles(mesh.indices().unwrap()).is_empty());
    }
}
