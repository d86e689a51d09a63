use super::*;
use tracing::warn;

impl<T: Positioned> QuadtreeInner<T> {
    // Children are visited after their parents, so walking the list backwards
    // settles the deepest nodes first.
    pub(crate) fn reorganize_visited(&mut self) {
        let visited = std::mem::take(&mut self.visited);
        for &node_idx in visited.iter().rev() {
            self.reorganize(node_idx);
        }
        self.visited = visited;
    }

    /// Moves every entry that no longer belongs in `node_idx`: entries that
    /// left the node's bounds go back up through the parent chain, entries
    /// that now fit a child go down.
    pub(crate) fn reorganize(&mut self, node_idx: u32) {
        let (bounds, parent) = {
            let node = &self.nodes[node_idx as usize];
            if node.entries.is_empty() {
                return;
            }
            (node.bounds, node.parent)
        };

        let entries = std::mem::take(&mut self.nodes[node_idx as usize].entries);
        let mut kept = Vec::with_capacity(entries.len());
        let mut descending = Vec::new();
        let mut escaped = Vec::new();
        for item in entries {
            let position = item.position();
            if !bounds.contains_point(position) {
                escaped.push(item);
                continue;
            }
            match self.child_containing(node_idx, position) {
                Some(child) => descending.push((child, item)),
                None => kept.push(item),
            }
        }
        self.nodes[node_idx as usize].entries = kept;

        for (child, item) in descending {
            if let Err(item) = self.place(child, item) {
                self.nodes[node_idx as usize].entries.push(item);
            }
        }

        for item in escaped {
            let Some(parent) = parent else {
                // Already parked at the root.
                self.nodes[ROOT as usize].entries.push(item);
                continue;
            };
            if let Err(item) = self.place(parent, item) {
                let position = item.position();
                warn!(
                    x = position.x,
                    y = position.y,
                    "entity moved outside the quadtree bounds, parking it at the root"
                );
                self.nodes[ROOT as usize].entries.push(item);
            }
        }
    }
}
