//! UV sphere tessellation for the planet, atmosphere shell and sun.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::{PI, TAU};

/// Vertex data for sphere meshes (position + normal + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle sphere centered at the origin
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub radius: f32,
}

impl SphereMesh {
    /// Tessellate a sphere into `width_segments` × `height_segments` quads
    ///
    /// Rows run from the north pole (v = 0) to the south pole. Each row repeats its first
    /// vertex at u = 1 so the texture seam has its own column. Pole vertices shift their
    /// u by half a segment so pole triangles sample the middle of their wedge. Triangles
    /// wind counter-clockwise seen from outside; the degenerate pole triangles are skipped.
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let columns = width_segments + 1;

        let mut vertices =
            Vec::with_capacity((columns * (height_segments + 1)) as usize);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;

            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * TAU;
                let theta = v * PI;

                let normal = [
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                ];

                vertices.push(Vertex {
                    position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                    normal,
                    uv: [u + u_offset, 1.0 - v],
                });
            }
        }

        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * columns + ix + 1;
                let b = iy * columns + ix;
                let c = (iy + 1) * columns + ix;
                let d = (iy + 1) * columns + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            vertices,
            indices,
            radius,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Invert the sphere parameterisation: object-space unit direction → UV
///
/// Matches the vertex UVs away from the poles; used where a UV is needed for a point
/// that is not a vertex (the CPU preview).
pub fn direction_to_uv(direction: glam::Vec3) -> glam::Vec2 {
    let theta = direction.y.clamp(-1.0, 1.0).acos();
    let phi = direction.z.atan2(-direction.x).rem_euclid(TAU);
    glam::Vec2::new(phi / TAU, 1.0 - theta / PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_sphere_counts() {
        let mesh = SphereMesh::new(5.0, 8, 6);

        assert_eq!(mesh.vertices.len(), 9 * 7);
        // Every quad yields two triangles except the pole rows, which yield one
        let triangles = 8 * 6 * 2 - 8 * 2;
        assert_eq!(mesh.indices.len(), triangles * 3);
    }

    #[test]
    fn test_vertices_lie_on_sphere() {
        let mesh = SphereMesh::new(5.1, 32, 16);
        for vertex in &mesh.vertices {
            let p = Vec3::from_array(vertex.position);
            let n = Vec3::from_array(vertex.normal);
            assert!((p.length() - 5.1).abs() < 1e-4);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(p.normalize().dot(n) > 0.9999);
        }
    }

    #[test]
    fn test_triangles_wind_outward() {
        let mesh = SphereMesh::new(1.0, 24, 12);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(
                face_normal.dot(centroid) > 0.0,
                "inward-facing triangle {:?}",
                tri
            );
        }
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = SphereMesh::new(10.0, 32, 32);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_direction_to_uv_matches_vertices() {
        let mesh = SphereMesh::new(1.0, 16, 8);
        // Skip pole rows (shifted u) and the seam column (u = 1 wraps to 0)
        for iy in 1..8 {
            for ix in 0..16 {
                let vertex = mesh.vertices[iy * 17 + ix];
                let uv = direction_to_uv(Vec3::from_array(vertex.normal));
                assert!((uv.x - vertex.uv[0]).abs() < 1e-4, "u at {},{}", ix, iy);
                assert!((uv.y - vertex.uv[1]).abs() < 1e-4, "v at {},{}", ix, iy);
            }
        }
    }
}
