use super::*;
use crate::error::QuadtreeResult;
use common::shapes::Rectangle;
use common::Vector2;
use smallvec::smallvec;
use tracing::debug;

impl<T> QuadtreeInner<T> {
    pub(crate) fn new_with_config(bounds: Rectangle, config: Config) -> QuadtreeResult<Self> {
        validate_root_bounds(&bounds)?;
        Ok(Self {
            nodes: vec![Node::new_leaf(bounds, None, 0)],
            config,
            len: 0,
            visited: Vec::new(),
        })
    }

    #[inline(always)]
    pub(crate) fn root_bounds(&self) -> Rectangle {
        self.nodes[ROOT as usize].bounds
    }

    pub(crate) fn child_containing(&self, node_idx: u32, position: Vector2<f32>) -> Option<u32> {
        let children = self.nodes[node_idx as usize].children?;
        children
            .into_iter()
            .find(|&child| self.nodes[child as usize].bounds.contains_point(position))
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT as usize];
        root.entries.clear();
        root.children = None;
        self.len = 0;
        self.visited.clear();
        debug!("quadtree cleared");
    }

    pub(crate) fn max_depth_reached(&self) -> u32 {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    pub(crate) fn all_node_bounds(&self, bounds: &mut Vec<Rectangle>) {
        let mut stack: NodeStack = smallvec![ROOT];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            bounds.push(node.bounds);
            if let Some(children) = node.children {
                stack.extend(children.into_iter().rev());
            }
        }
    }

    pub(crate) fn all_items(&self, items: &mut Vec<T>)
    where
        T: Clone,
    {
        let mut stack: NodeStack = smallvec![ROOT];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            items.extend(node.entries.iter().cloned());
            if let Some(children) = node.children {
                stack.extend(children.into_iter().rev());
            }
        }
    }
}

impl<T: Positioned> QuadtreeInner<T> {
    pub(crate) fn insert(&mut self, item: T) -> QuadtreeResult<()> {
        ensure_point_in_bounds(&self.root_bounds(), item.position())?;
        if let Err(item) = self.place(ROOT, item) {
            // Unreachable after the bounds check unless the position changed underneath us.
            self.nodes[ROOT as usize].entries.push(item);
        }
        self.len += 1;
        Ok(())
    }

    // Climb from `start` until a node contains the item, then descend to the
    // node that should own it. Hands the item back if even the root rejects it.
    pub(crate) fn place(&mut self, start: u32, item: T) -> Result<u32, T> {
        let position = item.position();
        let mut node_idx = start;
        while !self.nodes[node_idx as usize].bounds.contains_point(position) {
            match self.nodes[node_idx as usize].parent {
                Some(parent) => node_idx = parent,
                None => return Err(item),
            }
        }

        loop {
            let (is_leaf, has_room) = {
                let node = &self.nodes[node_idx as usize];
                (
                    node.children.is_none(),
                    node.entries.len() < self.config.node_capacity
                        || node.depth >= self.config.max_depth,
                )
            };

            if is_leaf {
                if has_room {
                    self.nodes[node_idx as usize].entries.push(item);
                    return Ok(node_idx);
                }
                self.split(node_idx);
            }

            match self.child_containing(node_idx, position) {
                Some(child) => node_idx = child,
                None => {
                    // Rounding on a split line can leave a point in no child.
                    self.nodes[node_idx as usize].entries.push(item);
                    return Ok(node_idx);
                }
            }
        }
    }

    // Subdivide a leaf into quadrants and push its entries down where they fit.
    fn split(&mut self, node_idx: u32) {
        let (bounds, depth) = {
            let node = &self.nodes[node_idx as usize];
            (node.bounds, node.depth)
        };

        let first = self.nodes.len() as u32;
        let children = [first, first + 1, first + 2, first + 3];
        for quadrant in 0..4 {
            self.nodes.push(Node::new_leaf(
                bounds.quadrant(quadrant),
                Some(node_idx),
                depth + 1,
            ));
        }
        self.nodes[node_idx as usize].children = Some(children);
        debug!(node = node_idx, depth, "quadtree node split");

        let entries = std::mem::take(&mut self.nodes[node_idx as usize].entries);
        let mut kept = Vec::new();
        for item in entries {
            match self.child_containing(node_idx, item.position()) {
                Some(child) => self.nodes[child as usize].entries.push(item),
                None => kept.push(item),
            }
        }
        self.nodes[node_idx as usize].entries = kept;
    }

    pub(crate) fn remove(&mut self, item: &T) -> bool
    where
        T: PartialEq,
    {
        // Follow the item's current position first; that is where it lives
        // unless it moved since the last reorganize.
        let position = item.position();
        let mut node_idx = ROOT;
        loop {
            if self.remove_from_node(node_idx, item) {
                return true;
            }
            match self.child_containing(node_idx, position) {
                Some(child) => node_idx = child,
                None => break,
            }
        }

        for node_idx in 0..self.nodes.len() as u32 {
            if self.remove_from_node(node_idx, item) {
                return true;
            }
        }
        false
    }

    fn remove_from_node(&mut self, node_idx: u32, item: &T) -> bool
    where
        T: PartialEq,
    {
        let entries = &mut self.nodes[node_idx as usize].entries;
        match entries.iter().position(|entry| entry == item) {
            Some(index) => {
                // Keep order stable; traversal order feeds the physics pass.
                entries.remove(index);
                self.len -= 1;
                true
            }
            None => false,
        }
    }
}
