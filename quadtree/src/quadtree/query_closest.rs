use super::*;
use crate::error::QuadtreeResult;
use common::Vector2;
use smallvec::smallvec;

impl<T: Positioned + Clone> QuadtreeInner<T> {
    /// Branch-and-bound nearest neighbour. A child is only entered when the
    /// closest point of its bounds beats the best distance found so far.
    pub(crate) fn find_closest(&self, point: Vector2<f32>) -> QuadtreeResult<Option<T>> {
        ensure_point_in_bounds(&self.root_bounds(), point)?;

        let mut best: Option<(f32, &T)> = None;
        let mut stack: NodeStack = smallvec![ROOT];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            if let Some((best_distance, _)) = best {
                if node.bounds.distance_sq_to_point(point) >= best_distance {
                    continue;
                }
            }

            for entry in &node.entries {
                let distance = distance_sq(entry.position(), point);
                if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                    best = Some((distance, entry));
                }
            }

            if let Some(children) = node.children {
                let mut ordered = children.map(|child| {
                    (
                        self.nodes[child as usize].bounds.distance_sq_to_point(point),
                        child,
                    )
                });
                // Farthest first so the nearest child is popped next.
                ordered.sort_by(|a, b| b.0.total_cmp(&a.0));
                for (distance, child) in ordered {
                    if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                        stack.push(child);
                    }
                }
            }
        }

        Ok(best.map(|(_, entry)| entry.clone()))
    }
}
