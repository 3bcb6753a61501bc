use glam::Vec3;
use smallvec::SmallVec;

use crate::resources::pool::{GeometryHandle, MaterialHandle, ResourcePool};
use crate::resources::primitives::{create_axes, create_grid};
use crate::resources::{Material, Mesh};
use crate::scene::node::Node;
use crate::scene::{NodeHandle, Scene};

/// A helper object this manager allocated and therefore must release.
#[derive(Debug, Clone, Copy)]
struct OwnedHelper {
    node: NodeHandle,
    geometry: GeometryHandle,
    material: MaterialHandle,
}

/// Owns the root scene graph, the resource pool and the static helpers.
///
/// Other components (reconciler, lighting) add their own nodes through
/// [`SceneManager::add_object`] and allocate in [`SceneManager::resources_mut`],
/// but they keep ownership of what they allocate. [`SceneManager::dispose`]
/// only releases the grid/axes this manager created.
pub struct SceneManager {
    scene: Scene,
    resources: ResourcePool,
    helpers: SmallVec<[OwnedHelper; 2]>,
    disposed: bool,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            resources: ResourcePool::new(),
            helpers: SmallVec::new(),
            disposed: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    #[must_use]
    pub fn resources(&self) -> &ResourcePool {
        &self.resources
    }

    #[inline]
    pub fn resources_mut(&mut self) -> &mut ResourcePool {
        &mut self.resources
    }

    /// Split borrow for callers that touch nodes and resources together.
    #[inline]
    pub fn parts_mut(&mut self) -> (&mut Scene, &mut ResourcePool) {
        (&mut self.scene, &mut self.resources)
    }

    pub fn add_object(&mut self, node: Node) -> NodeHandle {
        self.scene.add_node(node)
    }

    pub fn remove_object(&mut self, handle: NodeHandle) -> bool {
        self.scene.remove_node(handle)
    }

    pub fn add_grid_helper(&mut self, size: f32, divisions: u32, color: Vec3) -> NodeHandle {
        let geometry = self.resources.add_geometry(create_grid(size, divisions, color));
        self.add_helper("GridHelper", geometry)
    }

    pub fn add_axes_helper(&mut self, size: f32) -> NodeHandle {
        let geometry = self.resources.add_geometry(create_axes(size));
        self.add_helper("AxesHelper", geometry)
    }

    fn add_helper(&mut self, name: &str, geometry: GeometryHandle) -> NodeHandle {
        let material = self
            .resources
            .add_material(Material::new(Vec3::ONE).with_vertex_colors());
        let mesh = Mesh::new(geometry, material)
            .with_name(name)
            .with_render_order(-1);
        let node = self.scene.add_mesh(mesh, None);
        self.helpers.push(OwnedHelper {
            node,
            geometry,
            material,
        });
        node
    }

    #[must_use]
    pub fn helper_nodes(&self) -> Vec<NodeHandle> {
        self.helpers.iter().map(|h| h.node).collect()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Removes and releases the helpers. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for helper in self.helpers.drain(..) {
            self.scene.remove_node(helper.node);
            self.resources.dispose_geometry(helper.geometry);
            self.resources.dispose_material(helper.material);
        }
        self.disposed = true;
        log::debug!(
            "SceneManager disposed ({} geometries, {} materials still owned elsewhere)",
            self.resources.live_geometries(),
            self.resources.live_materials()
        );
    }
}
