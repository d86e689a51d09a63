use crate::tree::ColliderId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColliderError {
    #[error("collider {0:?} does not belong to this tree")]
    UnknownCollider(ColliderId),
    #[error("child index {index} out of range for collider {parent:?} with {len} children")]
    ChildIndexOutOfRange {
        parent: ColliderId,
        index: usize,
        len: usize,
    },
    #[error("attaching {child:?} under {parent:?} would make it its own ancestor")]
    Cycle {
        parent: ColliderId,
        child: ColliderId,
    },
    #[error("box half size must be finite and non-negative (x: {x}, y: {y})")]
    InvalidHalfSize { x: f32, y: f32 },
}

pub type ColliderResult<T> = Result<T, ColliderError>;
