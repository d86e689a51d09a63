use super::*;
use crate::error::QuadtreeResult;
use common::shapes::Rectangle;
use common::Vector2;

impl<T> Quadtree<T> {
    pub fn new(bounds: Rectangle) -> QuadtreeResult<Self> {
        Self::new_with_config(bounds, Config::default())
    }

    pub fn new_with_config(bounds: Rectangle, config: Config) -> QuadtreeResult<Self> {
        Ok(Self {
            inner: RefCell::new(QuadtreeInner::new_with_config(bounds, config)?),
        })
    }

    pub fn bounds(&self) -> Rectangle {
        self.inner.borrow().root_bounds()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth of the deepest node. A tree that never split reports 0.
    pub fn depth(&self) -> u32 {
        self.inner.borrow().max_depth_reached()
    }

    /// Drops every entry and every child node.
    pub fn clear(&mut self) {
        self.inner.get_mut().clear();
    }

    /// Bounds of every node, parents before children, for overlay drawing.
    pub fn all_node_bounds(&self, bounds: &mut Vec<Rectangle>) {
        self.inner.borrow().all_node_bounds(bounds);
    }

    /// Every stored entity in traversal order, without any maintenance.
    pub fn all_items(&self, items: &mut Vec<T>)
    where
        T: Clone,
    {
        self.inner.borrow().all_items(items);
    }
}

impl<T: Positioned> Quadtree<T> {
    /// Fails with [`QuadtreeError::OutOfRange`](crate::QuadtreeError) when the
    /// position lies outside the root bounds.
    pub fn insert(&mut self, item: T) -> QuadtreeResult<()> {
        self.inner.get_mut().insert(item)
    }

    /// Returns `false` when the item is not stored, including a second remove.
    pub fn remove(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.inner.get_mut().remove(item)
    }

    pub fn query_circle(
        &self,
        center: Vector2<f32>,
        radius: f32,
        reorganize: bool,
        out: &mut Vec<T>,
    ) -> QuadtreeResult<()>
    where
        T: Clone,
    {
        self.inner
            .borrow_mut()
            .query_circle(center, radius, reorganize, out)
    }

    pub fn query_rect(&self, rect: &Rectangle, reorganize: bool, out: &mut Vec<T>) -> QuadtreeResult<()>
    where
        T: Clone,
    {
        self.inner.borrow_mut().query_rect(rect, reorganize, out)
    }

    /// `Ok(None)` only when the tree is empty.
    pub fn find_closest(&self, point: Vector2<f32>) -> QuadtreeResult<Option<T>>
    where
        T: Clone,
    {
        self.inner.borrow().find_closest(point)
    }
}
