//! Resource Module
//!
//! CPU-side descriptions of the GPU resources the viewer allocates:
//!
//! - [`Geometry`]: vertex/index data plus bounding volume
//! - [`Material`]: color, emissive and opacity uniforms
//! - [`Mesh`]: a (geometry, material) pair attached to a scene node
//! - [`ResourcePool`]: the arenas that own geometries and materials
//! - [`primitives`]: sphere, line, grid and axes builders

pub mod geometry;
pub mod material;
pub mod mesh;
pub mod pool;
pub mod primitives;

pub use geometry::{BoundingBox, BoundingSphere, Geometry, Topology};
pub use material::Material;
pub use mesh::Mesh;
pub use pool::{GeometryHandle, MaterialHandle, ResourcePool};
