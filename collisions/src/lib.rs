//! Per-actor collider hierarchies.
//!
//! Each actor owns a [`ColliderTree`]: an arena of box and cross shapes linked
//! parent to child. Bounds are never stored; they are derived from the owner's
//! position whenever a tree is placed in the world with [`ColliderTree::at`].

mod error;
mod placed;
mod shape;
mod tree;

pub use error::{ColliderError, ColliderResult};
pub use placed::PlacedCollider;
pub use shape::{BoxShape, ColliderShape, CrossShape, OVERLAP_EPSILON};
pub use tree::{ColliderId, ColliderNode, ColliderTree};

pub use parry2d::bounding_volume::Aabb;
