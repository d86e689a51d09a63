use super::*;
use crate::error::QuadtreeResult;
use common::shapes::Rectangle;
use smallvec::smallvec;

impl<T: Positioned + Clone> QuadtreeInner<T> {
    // Same traversal as the circle query, pruned by rectangle overlap.
    pub(crate) fn query_rect(
        &mut self,
        rect: &Rectangle,
        reorganize: bool,
        out: &mut Vec<T>,
    ) -> QuadtreeResult<()> {
        validate_rect_dims(rect)?;

        let mut stack: NodeStack = smallvec![ROOT];
        self.visited.clear();
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            if !node.bounds.intersects(rect) {
                continue;
            }
            out.extend(
                node.entries
                    .iter()
                    .filter(|entry| rect.contains_point(entry.position()))
                    .cloned(),
            );
            if let Some(children) = node.children {
                stack.extend(children.into_iter().rev());
            }
            if reorganize {
                self.visited.push(node_idx);
            }
        }

        if reorganize {
            self.reorganize_visited();
        }
        Ok(())
    }
}
