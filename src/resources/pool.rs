//! GPU resource registry.
//!
//! Every geometry and material the viewer allocates lives in one of two
//! slotmap arenas here. Allocation returns a copyable handle; release is an
//! explicit [`ResourcePool::dispose_geometry`] / [`ResourcePool::dispose_material`]
//! call. A render backend mirrors these arenas one-to-one, so the live counts
//! reported here are exactly the number of GPU buffers/uniform blocks held.

use slotmap::{SlotMap, new_key_type};

use crate::resources::geometry::Geometry;
use crate::resources::material::Material;

new_key_type! {
    pub struct GeometryHandle;
    pub struct MaterialHandle;
}

#[derive(Debug, Default)]
pub struct ResourcePool {
    geometries: SlotMap<GeometryHandle, Geometry>,
    materials: SlotMap<MaterialHandle, Material>,
}

impl ResourcePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryHandle {
        self.geometries.insert(geometry)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialHandle {
        self.materials.insert(material)
    }

    #[must_use]
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(handle)
    }

    pub fn geometry_mut(&mut self, handle: GeometryHandle) -> Option<&mut Geometry> {
        self.geometries.get_mut(handle)
    }

    #[must_use]
    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle)
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(handle)
    }

    /// Releases a geometry. Returns `false` if it was already released.
    pub fn dispose_geometry(&mut self, handle: GeometryHandle) -> bool {
        self.geometries.remove(handle).is_some()
    }

    /// Releases a material. Returns `false` if it was already released.
    pub fn dispose_material(&mut self, handle: MaterialHandle) -> bool {
        self.materials.remove(handle).is_some()
    }

    #[inline]
    #[must_use]
    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    #[inline]
    #[must_use]
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }
}
