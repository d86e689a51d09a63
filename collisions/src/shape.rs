use crate::error::{ColliderError, ColliderResult};
use nalgebra::{Point2, Vector2};
use parry2d::bounding_volume::{Aabb, BoundingVolume};

/// Overlaps thinner than this on either axis are treated as touching, so
/// floating point drift after a correction does not register as a new hit.
pub const OVERLAP_EPSILON: f32 = 0.001;

/// A single AABB centred on the owner's position plus `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    pub half_size: Vector2<f32>,
    pub offset: Vector2<f32>,
}

impl BoxShape {
    pub fn new(half_size: Vector2<f32>, offset: Vector2<f32>) -> ColliderResult<Self> {
        if !half_size.x.is_finite() || !half_size.y.is_finite() || half_size.x < 0.0 || half_size.y < 0.0 {
            return Err(ColliderError::InvalidHalfSize {
                x: half_size.x,
                y: half_size.y,
            });
        }
        Ok(Self { half_size, offset })
    }

    /// Box of the given full size centred on the owner.
    pub fn sized(width: f32, height: f32) -> ColliderResult<Self> {
        Self::new(Vector2::new(width / 2.0, height / 2.0), Vector2::zeros())
    }

    pub fn aabb(&self, origin: Vector2<f32>) -> Aabb {
        let center = origin + self.offset;
        Aabb::new(
            Point2::from(center - self.half_size),
            Point2::from(center + self.half_size),
        )
    }
}

/// Two boxes acting as one collider: a wide, short box answering top/bottom
/// contacts and a tall, narrow box answering side contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossShape {
    pub horizontal: BoxShape,
    pub vertical: BoxShape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Box(BoxShape),
    Cross(CrossShape),
}

impl ColliderShape {
    pub fn aabb(&self, origin: Vector2<f32>) -> Aabb {
        match self {
            ColliderShape::Box(shape) => shape.aabb(origin),
            ColliderShape::Cross(cross) => cross
                .horizontal
                .aabb(origin)
                .merged(&cross.vertical.aabb(origin)),
        }
    }
}

impl From<BoxShape> for ColliderShape {
    fn from(shape: BoxShape) -> Self {
        ColliderShape::Box(shape)
    }
}

impl From<CrossShape> for ColliderShape {
    fn from(shape: CrossShape) -> Self {
        ColliderShape::Cross(shape)
    }
}

/// The overlapping pair of boxes between two shapes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Contact {
    pub(crate) mine: Aabb,
    pub(crate) theirs: Aabb,
    pub(crate) overlap: Aabb,
}

impl Contact {
    pub(crate) fn area(&self) -> f32 {
        let extents = self.overlap.extents();
        extents.x * extents.y
    }

    /// Minimum translation that pushes `mine` out of `theirs` along the axis
    /// with the shallower overlap. Ties resolve vertically.
    pub(crate) fn displacement(&self) -> Vector2<f32> {
        let extents = self.overlap.extents();
        if extents.x < extents.y {
            let sign = if self.mine.mins.x < self.theirs.mins.x { -1.0 } else { 1.0 };
            Vector2::new(sign * extents.x, 0.0)
        } else {
            let sign = if self.mine.mins.y < self.theirs.mins.y { -1.0 } else { 1.0 };
            Vector2::new(0.0, sign * extents.y)
        }
    }
}

fn box_contact(mine: Aabb, theirs: Aabb) -> Option<Contact> {
    let overlap = mine.intersection(&theirs)?;
    let extents = overlap.extents();
    if extents.x <= OVERLAP_EPSILON || extents.y <= OVERLAP_EPSILON {
        return None;
    }
    Some(Contact {
        mine,
        theirs,
        overlap,
    })
}

fn deeper(a: Option<Contact>, b: Option<Contact>) -> Option<Contact> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.area() > a.area() { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Deepest overlap between two placed shapes. A cross contributes whichever
/// of its boxes overlaps the most.
pub(crate) fn contact(
    mine: &ColliderShape,
    mine_origin: Vector2<f32>,
    theirs: &ColliderShape,
    theirs_origin: Vector2<f32>,
) -> Option<Contact> {
    match (mine, theirs) {
        (ColliderShape::Box(a), ColliderShape::Box(b)) => {
            box_contact(a.aabb(mine_origin), b.aabb(theirs_origin))
        }
        (ColliderShape::Cross(cross), _) => deeper(
            contact(&cross.horizontal.into(), mine_origin, theirs, theirs_origin),
            contact(&cross.vertical.into(), mine_origin, theirs, theirs_origin),
        ),
        (ColliderShape::Box(_), ColliderShape::Cross(cross)) => deeper(
            contact(mine, mine_origin, &cross.horizontal.into(), theirs_origin),
            contact(mine, mine_origin, &cross.vertical.into(), theirs_origin),
        ),
    }
}
