use slotmap::{SlotMap, SparseSecondaryMap};

use crate::resources::mesh::Mesh;
use crate::scene::light::Light;
use crate::scene::node::Node;
use crate::scene::transform_system;
use crate::scene::{LightKey, MeshKey, NodeHandle};

/// Retained-mode scene graph.
///
/// Nodes live in a slotmap arena; meshes and lights are components stored in
/// their own pools and attached to nodes through sparse secondary maps.
/// Removing a node drops its components but never releases the geometry or
/// material a mesh points at; that is the allocator's job.
pub struct Scene {
    pub(crate) nodes: SlotMap<NodeHandle, Node>,
    pub(crate) root_nodes: Vec<NodeHandle>,

    meshes: SlotMap<MeshKey, Mesh>,
    lights: SlotMap<LightKey, Light>,

    mesh_components: SparseSecondaryMap<NodeHandle, MeshKey>,
    light_components: SparseSecondaryMap<NodeHandle, LightKey>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            mesh_components: SparseSecondaryMap::new(),
            light_components: SparseSecondaryMap::new(),
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        if self.nodes.contains_key(parent) {
            self.nodes[parent].children.push(handle);
            self.nodes[handle].parent = Some(parent);
        } else {
            log::warn!("Parent node not found, adding '{}' at root", self.nodes[handle].name);
            self.root_nodes.push(handle);
        }
        handle
    }

    /// Re-parents `child` under `parent`, detaching it from its old parent.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            log::warn!("attach() called with a stale node handle");
            return;
        }

        self.detach_from_parent(child);
        self.nodes[parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
    }

    fn detach_from_parent(&mut self, handle: NodeHandle) {
        match self.nodes.get(handle).and_then(Node::parent) {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent)
                    && let Some(i) = p.children.iter().position(|&c| c == handle)
                {
                    p.children.remove(i);
                }
            }
            None => {
                if let Some(i) = self.root_nodes.iter().position(|&c| c == handle) {
                    self.root_nodes.remove(i);
                }
            }
        }
    }

    /// Removes a node and its whole subtree, including attached components.
    ///
    /// Returns `false` if the handle was already gone.
    pub fn remove_node(&mut self, handle: NodeHandle) -> bool {
        if !self.nodes.contains_key(handle) {
            return false;
        }
        self.detach_from_parent(handle);

        let mut stack = vec![handle];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            if let Some(mesh) = self.mesh_components.remove(current) {
                self.meshes.remove(mesh);
            }
            if let Some(light) = self.light_components.remove(current) {
                self.lights.remove(light);
            }
            stack.extend(node.children);
        }
        true
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    #[must_use]
    pub fn root_nodes(&self) -> &[NodeHandle] {
        &self.root_nodes
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// Creates a node carrying `mesh` under `parent` (or at the root).
    pub fn add_mesh(&mut self, mesh: Mesh, parent: Option<NodeHandle>) -> NodeHandle {
        let node = Node::new(mesh.name.clone());
        let handle = match parent {
            Some(parent) => self.add_to_parent(node, parent),
            None => self.add_node(node),
        };
        let key = self.meshes.insert(mesh);
        self.mesh_components.insert(handle, key);
        handle
    }

    pub fn add_light(&mut self, light: Light, name: &str) -> NodeHandle {
        let handle = self.add_node(Node::new(name));
        let key = self.lights.insert(light);
        self.light_components.insert(handle, key);
        handle
    }

    #[must_use]
    pub fn mesh(&self, node: NodeHandle) -> Option<&Mesh> {
        let key = self.mesh_components.get(node)?;
        self.meshes.get(*key)
    }

    #[must_use]
    pub fn light(&self, node: NodeHandle) -> Option<&Light> {
        let key = self.light_components.get(node)?;
        self.lights.get(*key)
    }

    pub fn light_mut(&mut self, node: NodeHandle) -> Option<&mut Light> {
        let key = self.light_components.get(node)?;
        self.lights.get_mut(*key)
    }

    #[inline]
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    #[must_use]
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Refreshes every world matrix. Must run before extraction or picking.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    /// Visible mesh nodes in depth-first order; hidden nodes prune their subtree.
    #[must_use]
    pub fn visible_meshes(&self) -> Vec<(&Node, &Mesh)> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeHandle> = self.root_nodes.iter().rev().copied().collect();

        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            if let Some(mesh) = self.mesh(handle)
                && mesh.visible
            {
                out.push((node, mesh));
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Enabled lights with their node world matrices.
    pub fn active_lights(&self) -> impl Iterator<Item = (&Node, &Light)> {
        self.light_components.iter().filter_map(|(handle, key)| {
            let node = self.nodes.get(handle)?;
            let light = self.lights.get(*key)?;
            (node.visible && light.enabled).then_some((node, light))
        })
    }
}
