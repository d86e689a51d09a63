use crate::error::{ColliderError, ColliderResult};
use crate::placed::PlacedCollider;
use crate::shape::ColliderShape;
use nalgebra::Vector2;
use parry2d::bounding_volume::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(u32);

impl ColliderId {
    #[inline(always)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct ColliderNode {
    pub shape: ColliderShape,
    /// A non-collidable node never reports itself as the hit but still lets
    /// its children be found.
    pub collidable: bool,
    /// Disabled nodes hide their whole subtree.
    pub enabled: bool,
    parent: Option<ColliderId>,
    children: Vec<ColliderId>,
}

impl ColliderNode {
    fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            collidable: true,
            enabled: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<ColliderId> {
        self.parent
    }

    pub fn children(&self) -> &[ColliderId] {
        &self.children
    }
}

/// Arena of collider nodes. Parent and child links are ids into the arena, so
/// re-parenting only rewrites two lists. Detached nodes stay in the arena and
/// can be attached again later.
#[derive(Debug, Clone)]
pub struct ColliderTree {
    nodes: Vec<ColliderNode>,
    root: ColliderId,
}

impl ColliderTree {
    pub fn new(root: impl Into<ColliderShape>) -> Self {
        Self {
            nodes: vec![ColliderNode::new(root.into())],
            root: ColliderId(0),
        }
    }

    pub fn root(&self) -> ColliderId {
        self.root
    }

    pub(crate) fn nodes_slice(&self) -> &[ColliderNode] {
        &self.nodes
    }

    /// Adds a detached, collidable node.
    pub fn create(&mut self, shape: impl Into<ColliderShape>) -> ColliderId {
        let id = ColliderId(self.nodes.len() as u32);
        self.nodes.push(ColliderNode::new(shape.into()));
        id
    }

    /// Creates a node and attaches it under `parent` in one step.
    pub fn create_child(
        &mut self,
        parent: ColliderId,
        shape: impl Into<ColliderShape>,
    ) -> ColliderResult<ColliderId> {
        self.node(parent)?;
        let child = self.create(shape);
        self.add_child(parent, child)?;
        Ok(child)
    }

    pub fn node(&self, id: ColliderId) -> ColliderResult<&ColliderNode> {
        self.nodes
            .get(id.index())
            .ok_or(ColliderError::UnknownCollider(id))
    }

    pub fn node_mut(&mut self, id: ColliderId) -> ColliderResult<&mut ColliderNode> {
        self.nodes
            .get_mut(id.index())
            .ok_or(ColliderError::UnknownCollider(id))
    }

    pub fn set_collidable(&mut self, id: ColliderId, collidable: bool) -> ColliderResult<()> {
        self.node_mut(id)?.collidable = collidable;
        Ok(())
    }

    pub fn set_enabled(&mut self, id: ColliderId, enabled: bool) -> ColliderResult<()> {
        self.node_mut(id)?.enabled = enabled;
        Ok(())
    }

    pub fn child(&self, parent: ColliderId, index: usize) -> ColliderResult<ColliderId> {
        let children = &self.node(parent)?.children;
        children
            .get(index)
            .copied()
            .ok_or(ColliderError::ChildIndexOutOfRange {
                parent,
                index,
                len: children.len(),
            })
    }

    /// Attaches `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn add_child(&mut self, parent: ColliderId, child: ColliderId) -> ColliderResult<()> {
        self.node(parent)?;
        self.node(child)?;

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == child {
                return Err(ColliderError::Cycle { parent, child });
            }
            ancestor = self.nodes[id.index()].parent;
        }

        self.remove_from_parent(child)?;
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Returns `false` when `child` is not a direct child of `parent`.
    pub fn remove_child(&mut self, parent: ColliderId, child: ColliderId) -> ColliderResult<bool> {
        self.node(child)?;
        let children = &mut self.node_mut(parent)?.children;
        let Some(index) = children.iter().position(|&id| id == child) else {
            return Ok(false);
        };
        children.remove(index);
        self.nodes[child.index()].parent = None;
        Ok(true)
    }

    pub fn remove_from_parent(&mut self, id: ColliderId) -> ColliderResult<bool> {
        match self.node(id)?.parent {
            Some(parent) => self.remove_child(parent, id),
            None => Ok(false),
        }
    }

    /// The root placed at the owner's position.
    pub fn at(&self, origin: Vector2<f32>) -> PlacedCollider<'_> {
        PlacedCollider::new(self, self.root, origin)
    }

    pub fn place(&self, id: ColliderId, origin: Vector2<f32>) -> ColliderResult<PlacedCollider<'_>> {
        self.node(id)?;
        Ok(PlacedCollider::new(self, id, origin))
    }

    /// `(id, bounds)` of every enabled node reachable from the root, parents
    /// first, for overlay drawing.
    pub fn debug_bounds(&self, origin: Vector2<f32>, out: &mut Vec<(ColliderId, Aabb)>) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            if !node.enabled {
                continue;
            }
            out.push((id, node.shape.aabb(origin)));
            stack.extend(node.children.iter().rev().copied());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::BoxShape;

    fn unit() -> BoxShape {
        BoxShape::sized(1.0, 1.0).unwrap()
    }

    #[test]
    fn reparenting_detaches_from_previous_parent() {
        let mut tree = ColliderTree::new(unit());
        let root = tree.root();
        let a = tree.create_child(root, unit()).unwrap();
        let b = tree.create_child(root, unit()).unwrap();
        let leaf = tree.create_child(a, unit()).unwrap();

        tree.add_child(b, leaf).unwrap();
        assert!(tree.node(a).unwrap().children().is_empty());
        assert_eq!(tree.node(b).unwrap().children(), &[leaf]);
        assert_eq!(tree.node(leaf).unwrap().parent(), Some(b));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut tree = ColliderTree::new(unit());
        let root = tree.root();
        let a = tree.create_child(root, unit()).unwrap();
        let b = tree.create_child(a, unit()).unwrap();
        assert_eq!(
            tree.add_child(b, root),
            Err(ColliderError::Cycle {
                parent: b,
                child: root
            })
        );
        assert_eq!(
            tree.add_child(a, a),
            Err(ColliderError::Cycle { parent: a, child: a })
        );
        // Failed attach leaves links untouched.
        assert_eq!(tree.node(b).unwrap().parent(), Some(a));
    }

    #[test]
    fn remove_twice_reports_false() {
        let mut tree = ColliderTree::new(unit());
        let root = tree.root();
        let a = tree.create_child(root, unit()).unwrap();
        assert_eq!(tree.remove_from_parent(a), Ok(true));
        assert_eq!(tree.remove_from_parent(a), Ok(false));
        assert_eq!(tree.remove_child(root, a), Ok(false));
    }

    #[test]
    fn child_index_out_of_range() {
        let mut tree = ColliderTree::new(unit());
        let root = tree.root();
        let a = tree.create_child(root, unit()).unwrap();
        assert_eq!(tree.child(root, 0), Ok(a));
        assert_eq!(
            tree.child(root, 1),
            Err(ColliderError::ChildIndexOutOfRange {
                parent: root,
                index: 1,
                len: 1
            })
        );
    }

    #[test]
    fn debug_bounds_skip_disabled_subtrees() {
        let mut tree = ColliderTree::new(unit());
        let root = tree.root();
        let a = tree.create_child(root, unit()).unwrap();
        tree.create_child(a, unit()).unwrap();
        let b = tree.create_child(root, unit()).unwrap();
        tree.set_enabled(a, false).unwrap();

        let mut out = Vec::new();
        tree.debug_bounds(Vector2::new(3.0, 4.0), &mut out);
        let ids: Vec<_> = out.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![root, b]);
    }
}
