use crate::shape::{self, ColliderShape, Contact};
use crate::tree::{ColliderId, ColliderNode, ColliderTree};
use nalgebra::Vector2;
use parry2d::bounding_volume::Aabb;

/// A collider node positioned in the world. Cheap to copy; bounds are computed
/// on demand from the owner's position and the node's shape.
#[derive(Debug, Clone, Copy)]
pub struct PlacedCollider<'a> {
    tree: &'a ColliderTree,
    id: ColliderId,
    origin: Vector2<f32>,
}

impl<'a> PlacedCollider<'a> {
    pub(crate) fn new(tree: &'a ColliderTree, id: ColliderId, origin: Vector2<f32>) -> Self {
        Self { tree, id, origin }
    }

    pub fn id(&self) -> ColliderId {
        self.id
    }

    pub fn origin(&self) -> Vector2<f32> {
        self.origin
    }

    fn node(&self) -> &'a ColliderNode {
        // Ids are checked when a placement is created and arena slots are never freed.
        &self.tree.nodes_slice()[self.id.index()]
    }

    pub fn shape(&self) -> &'a ColliderShape {
        &self.node().shape
    }

    pub fn bounds(&self) -> Aabb {
        self.shape().aabb(self.origin)
    }

    pub fn min(&self) -> Vector2<f32> {
        self.bounds().mins.coords
    }

    pub fn max(&self) -> Vector2<f32> {
        self.bounds().maxs.coords
    }

    fn contact(&self, other: &PlacedCollider<'_>) -> Option<Contact> {
        shape::contact(self.shape(), self.origin, other.shape(), other.origin)
    }

    /// Overlap test ignoring the `collidable` and `enabled` flags.
    pub fn intersects(&self, other: &PlacedCollider<'_>) -> bool {
        self.contact(other).is_some()
    }

    /// Area of the deepest overlapping box pair, zero when apart.
    pub fn overlap_area(&self, other: &PlacedCollider<'_>) -> f32 {
        self.contact(other).map_or(0.0, |contact| contact.area())
    }

    /// Translation to add to this collider's owner so it no longer overlaps
    /// `other`. Only one axis is ever non-zero; zero when apart.
    pub fn displacement_vector(&self, other: &PlacedCollider<'_>) -> Vector2<f32> {
        self.contact(other)
            .map_or_else(Vector2::zeros, |contact| contact.displacement())
    }

    /// Deepest enabled, collidable node in this subtree overlapping `other`.
    /// Children are only consulted when this node itself overlaps, and a
    /// non-collidable node never answers for itself.
    pub fn most_specific_colliding_child(
        &self,
        other: &PlacedCollider<'_>,
    ) -> Option<PlacedCollider<'a>> {
        let node = self.node();
        if !node.enabled || !self.intersects(other) {
            return None;
        }
        for &child in node.children() {
            let placed = PlacedCollider::new(self.tree, child, self.origin);
            if let Some(hit) = placed.most_specific_colliding_child(other) {
                return Some(hit);
            }
        }
        node.collidable.then_some(*self)
    }
}
