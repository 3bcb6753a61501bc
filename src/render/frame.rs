//! Frame extraction.
//!
//! Flattens the scene graph into the plain, `bytemuck`-castable arrays a GPU
//! backend uploads verbatim: one camera uniform, a light array, per-geometry
//! instance batches for points and a single line-list vertex stream for
//! helpers and drop-lines.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::resources::geometry::Topology;
use crate::resources::pool::{GeometryHandle, ResourcePool};
use crate::scene::camera::CameraManager;
use crate::scene::Scene;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _padding: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    pub position: [f32; 3],
    /// 0 = ambient, 1 = directional, 2 = point
    pub kind: u32,
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Per-point instance record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    pub model: [[f32; 4]; 4],
    /// rgb + opacity
    pub color: [f32; 4],
    /// rgb + intensity
    pub emissive: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    /// rgb + opacity
    pub color: [f32; 4],
}

/// All instances drawn with one geometry.
#[derive(Debug, Clone)]
pub struct InstanceBatch {
    pub geometry: GeometryHandle,
    pub instances: Vec<PointInstance>,
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub frame_index: u64,
    pub camera: CameraUniform,
    pub lights: Vec<LightUniform>,
    pub batches: Vec<InstanceBatch>,
    pub lines: Vec<LineVertex>,
}

impl FrameSnapshot {
    /// Builds a snapshot. World matrices must be current
    /// (see [`Scene::update_matrix_world`]).
    #[must_use]
    pub fn extract(frame_index: u64, scene: &Scene, resources: &ResourcePool, camera: &CameraManager) -> Self {
        let position = camera.position();
        let camera_uniform = CameraUniform {
            view_projection: camera.view_projection().to_cols_array_2d(),
            position: position.to_array(),
            _padding: 0.0,
        };

        let lights = scene
            .active_lights()
            .map(|(node, light)| LightUniform {
                position: Vec3::from(node.world_matrix().translation).to_array(),
                kind: light.kind_index(),
                color: light.color.to_array(),
                intensity: light.intensity,
            })
            .collect();

        let mut batches: Vec<InstanceBatch> = Vec::new();
        let mut lines = Vec::new();

        let mut meshes = scene.visible_meshes();
        meshes.sort_by_key(|(_, mesh)| mesh.render_order);

        for (node, mesh) in meshes {
            let (Some(geometry), Some(material)) =
                (resources.geometry(mesh.geometry), resources.material(mesh.material))
            else {
                log::warn!("Mesh '{}' references a released resource, skipping", mesh.name);
                continue;
            };
            let world = node.world_matrix();

            match geometry.topology {
                Topology::TriangleList => {
                    let instance = PointInstance {
                        model: Mat4::from(*world).to_cols_array_2d(),
                        color: material.color().extend(material.opacity()).to_array(),
                        emissive: material.emissive().extend(material.emissive_intensity()).to_array(),
                    };
                    match batches.iter_mut().find(|b| b.geometry == mesh.geometry) {
                        Some(batch) => batch.instances.push(instance),
                        None => batches.push(InstanceBatch {
                            geometry: mesh.geometry,
                            instances: vec![instance],
                        }),
                    }
                }
                Topology::LineList => {
                    let colors = geometry.colors();
                    let use_vertex_colors = material.vertex_colors() && colors.len() == geometry.positions().len();
                    for (i, &p) in geometry.positions().iter().enumerate() {
                        let rgb = if use_vertex_colors { colors[i] } else { material.color() };
                        lines.push(LineVertex {
                            position: world.transform_point3(p).to_array(),
                            color: rgb.extend(material.opacity()).to_array(),
                        });
                    }
                }
            }
        }

        Self {
            frame_index,
            camera: camera_uniform,
            lights,
            batches,
            lines,
        }
    }

    /// Total point instances across batches.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(|b| b.instances.len()).sum()
    }

    /// Raw bytes of the line stream, ready for a vertex buffer upload.
    #[must_use]
    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }
}

/// Receives finished frames. Implemented by the GPU backend of the host.
pub trait RenderTarget {
    fn submit(&mut self, frame: &FrameSnapshot);
}
