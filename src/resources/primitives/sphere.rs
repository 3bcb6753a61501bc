use glam::Vec3;
use std::f32::consts::PI;

use crate::resources::geometry::{Geometry, Topology};

pub struct SphereOptions {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            radius: 0.1,
            width_segments: 16,
            height_segments: 12,
        }
    }
}

/// UV sphere centred on the origin. This is the shared base primitive every
/// sensor point references.
#[must_use]
pub fn create_sphere(options: &SphereOptions) -> Geometry {
    let radius = options.radius;
    let width_segments = options.width_segments.max(3);
    let height_segments = options.height_segments.max(2);

    let vertex_count = ((width_segments + 1) * (height_segments + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut indices = Vec::new();

    for y in 0..=height_segments {
        let v_ratio = y as f32 / height_segments as f32;
        // Latitude: 0 (south pole) to PI (north pole)
        let theta = v_ratio * PI;
        let py = -radius * theta.cos();
        let ring_radius = radius * theta.sin();

        for x in 0..=width_segments {
            let u_ratio = x as f32 / width_segments as f32;
            let phi = u_ratio * 2.0 * PI;

            let position = Vec3::new(-ring_radius * phi.cos(), py, ring_radius * phi.sin());
            positions.push(position);
            normals.push(position / radius);
        }
    }

    // Two triangles per grid cell; the degenerate ones at the poles are harmless.
    let stride = width_segments + 1;
    for y in 0..height_segments {
        for x in 0..width_segments {
            let v0 = y * stride + x;
            let v1 = v0 + 1;
            let v2 = (y + 1) * stride + x;
            let v3 = v2 + 1;

            indices.extend_from_slice(&[v0, v1, v2, v1, v3, v2]);
        }
    }

    Geometry::new(Topology::TriangleList)
        .with_positions(positions)
        .with_normals(normals)
        .with_indices(indices)
}
