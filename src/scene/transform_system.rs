//! Transform System
//!
//! Propagates local matrices down the hierarchy into world matrices. Kept
//! separate from [`Scene`](crate::scene::Scene) so it only borrows the node
//! arena and the root list.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Iterative depth-first update; avoids recursion so deep hierarchies cannot
/// overflow the stack.
///
/// A node's world matrix is recomputed when its own local matrix changed or
/// when any ancestor's world matrix changed during this pass.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = roots
        .iter()
        .rev()
        .map(|&root| (root, Affine3A::IDENTITY, false))
        .collect();

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let changed = local_changed || parent_changed;
        if changed {
            let world = parent_world * node.transform.local_matrix;
            node.transform.set_world_matrix(world);
        }

        let world = node.transform.world_matrix;
        for &child in node.children.iter().rev() {
            stack.push((child, world, changed));
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn child_inherits_parent_translation() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let parent = nodes.insert(Node::new("parent"));
        let child = nodes.insert(Node::new("child"));
        nodes[parent].children.push(child);
        nodes[child].parent = Some(parent);

        nodes[parent].transform.position = Vec3::new(1.0, 0.0, 0.0);
        nodes[child].transform.position = Vec3::new(0.0, 2.0, 0.0);
        update_hierarchy_iterative(&mut nodes, &[parent]);

        let world = nodes[child].world_matrix().translation;
        assert!((Vec3::from(world) - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);

        // Moving only the parent still refreshes the child
        nodes[parent].transform.position = Vec3::new(-1.0, 0.0, 0.0);
        update_hierarchy_iterative(&mut nodes, &[parent]);
        let world = nodes[child].world_matrix().translation;
        assert!((Vec3::from(world) - Vec3::new(-1.0, 2.0, 0.0)).length() < 1e-5);
    }
}
