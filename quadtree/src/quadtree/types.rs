use crate::error::{QuadtreeError, QuadtreeResult};
use common::shapes::Rectangle;
use common::Vector2;
use smallvec::SmallVec;

pub(crate) const ROOT: u32 = 0;

/// Anything stored in a [`Quadtree`](super::Quadtree) must report where it
/// currently is. The tree only reads the position; an entity that moves is
/// relocated lazily by the next reorganizing query that visits its node.
pub trait Positioned {
    fn position(&self) -> Vector2<f32>;
}

impl Positioned for Vector2<f32> {
    fn position(&self) -> Vector2<f32> {
        *self
    }
}

impl<K> Positioned for (K, Vector2<f32>) {
    fn position(&self) -> Vector2<f32> {
        self.1
    }
}

pub(crate) type NodeStack = SmallVec<[u32; 64]>;

pub(crate) struct Node<T> {
    pub(crate) bounds: Rectangle,
    pub(crate) entries: Vec<T>,
    // Top-left, bottom-left, top-right, bottom-right.
    pub(crate) children: Option<[u32; 4]>,
    pub(crate) parent: Option<u32>,
    pub(crate) depth: u32,
}

impl<T> Node<T> {
    pub(crate) fn new_leaf(bounds: Rectangle, parent: Option<u32>, depth: u32) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
            parent,
            depth,
        }
    }
}

#[inline(always)]
pub(crate) fn distance_sq(a: Vector2<f32>, b: Vector2<f32>) -> f32 {
    (a - b).norm_squared()
}

pub(crate) fn validate_circle_radius(radius: f32) -> QuadtreeResult<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(QuadtreeError::InvalidCircleRadius { radius });
    }
    Ok(())
}

pub(crate) fn validate_rect_dims(rect: &Rectangle) -> QuadtreeResult<()> {
    if !rect.is_finite() || rect.width < 0.0 || rect.height < 0.0 {
        return Err(QuadtreeError::InvalidRectangleDims {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        });
    }
    Ok(())
}

pub(crate) fn validate_root_bounds(rect: &Rectangle) -> QuadtreeResult<()> {
    if !rect.is_finite() || rect.width <= 0.0 || rect.height <= 0.0 {
        return Err(QuadtreeError::InvalidBounds {
            width: rect.width,
            height: rect.height,
        });
    }
    Ok(())
}

pub(crate) fn ensure_point_in_bounds(bounds: &Rectangle, point: Vector2<f32>) -> QuadtreeResult<()> {
    if !bounds.contains_point(point) {
        return Err(QuadtreeError::OutOfRange {
            x: point.x,
            y: point.y,
            bounds_min_x: bounds.left(),
            bounds_min_y: bounds.top(),
            bounds_max_x: bounds.right(),
            bounds_max_y: bounds.bottom(),
        });
    }
    Ok(())
}
