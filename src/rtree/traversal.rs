//! Traversal of the packed RTree through the [`SpatialTree`] trait.

use crate::rtree::util::upper_bound;
use crate::rtree::RTree;
use crate::tree::{SpatialTree, TreeChild};

/// Node handles are positions into [`RTree::boxes`] and item payloads are insertion indexes.
impl SpatialTree for RTree {
    type Node<'a>
        = usize
    where
        Self: 'a;
    type Item<'a>
        = u32
    where
        Self: 'a;

    fn children<'a>(&'a self, parent: Option<usize>, out: &mut Vec<TreeChild<usize, u32>>) {
        let Some(node_pos) = parent.or_else(|| self.root_pos()) else {
            return;
        };
        let num_items = self.num_items() as usize;

        if node_pos < num_items * 4 {
            // Only reachable as the root of a single-item tree, which is the item itself
            out.push(TreeChild::Leaf {
                bbox: self.box_at(node_pos),
                item: self.indices[node_pos >> 2] as u32,
            });
            return;
        }

        // find the start and end indexes of the children of this node
        let start = self.indices[node_pos >> 2];
        let end = (start + self.node_size() as usize * 4)
            .min(upper_bound(start, self.metadata.level_bounds()));

        out.extend((start..end).step_by(4).map(|pos| {
            let bbox = self.box_at(pos);
            if pos < num_items * 4 {
                TreeChild::Leaf {
                    bbox,
                    item: self.indices[pos >> 2] as u32,
                }
            } else {
                TreeChild::Internal { bbox, node: pos }
            }
        }));
    }
}
