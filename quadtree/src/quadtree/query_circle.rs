use super::*;
use crate::error::QuadtreeResult;
use common::Vector2;
use smallvec::smallvec;

impl<T: Positioned + Clone> QuadtreeInner<T> {
    /// Collects every entity within `radius` of `center`. Subtrees whose
    /// bounds are farther than `radius` are skipped. With `reorganize`, each
    /// visited node is relocated only after all matches are in `out`.
    pub(crate) fn query_circle(
        &mut self,
        center: Vector2<f32>,
        radius: f32,
        reorganize: bool,
        out: &mut Vec<T>,
    ) -> QuadtreeResult<()> {
        validate_circle_radius(radius)?;
        ensure_point_in_bounds(&self.root_bounds(), center)?;

        let radius_sq = radius * radius;
        let mut stack: NodeStack = smallvec![ROOT];
        self.visited.clear();
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            if node.bounds.distance_sq_to_point(center) > radius_sq {
                continue;
            }
            out.extend(
                node.entries
                    .iter()
                    .filter(|entry| distance_sq(entry.position(), center) <= radius_sq)
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
