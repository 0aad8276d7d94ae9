use geo_traits::{CoordTrait, RectTrait};

use crate::bbox::BoundingBox;
use crate::error::{GeoKnnError, Result};
use crate::rtree::util::{compute_num_nodes, upper_bound};

/// Common metadata to describe a tree
#[derive(Debug, Clone, PartialEq)]
pub struct RTreeMetadata {
    node_size: u16,
    num_items: u32,
    num_nodes: usize,
    level_bounds: Vec<usize>,
}

impl RTreeMetadata {
    /// Compute the layout of a tree with the given number of items and node size.
    ///
    /// `node_size` must be at least 2.
    pub(crate) fn new(num_items: u32, node_size: u16) -> Self {
        let (num_nodes, level_bounds) = compute_num_nodes(num_items, node_size);
        Self {
            node_size,
            num_items,
            num_nodes,
            level_bounds,
        }
    }

    /// The maximum number of children of each node.
    pub fn node_size(&self) -> u16 {
        self.node_size
    }

    /// The number of items stored in the tree.
    pub fn num_items(&self) -> u32 {
        self.num_items
    }

    /// The number of boxes in the tree, items and internal nodes together.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// The offsets into the boxes slice where each level ends.
    pub fn level_bounds(&self) -> &[usize] {
        &self.level_bounds
    }
}

/// A static, Hilbert-packed RTree.
///
/// Create one with [`RTreeBuilder`][crate::rtree::RTreeBuilder]. Items are identified by their
/// insertion index, which is also the payload reported by nearest-neighbor searches through the
/// [`SpatialTree`][crate::SpatialTree] implementation.
///
/// The tree is laid out bottom-up in one flat array of boxes: first every item, then each level
/// of internal nodes, with the root last. Positions into that array (multiples of 4) are the node
/// handles used while traversing.
#[derive(Debug, Clone, PartialEq)]
pub struct RTree {
    pub(crate) boxes: Vec<f64>,
    /// For items, the insertion index. For internal nodes, the position of the first child.
    pub(crate) indices: Vec<usize>,
    pub(crate) metadata: RTreeMetadata,
}

impl RTree {
    pub(crate) fn new(boxes: Vec<f64>, indices: Vec<usize>, metadata: RTreeMetadata) -> Self {
        debug_assert_eq!(boxes.len(), metadata.num_nodes() * 4);
        debug_assert_eq!(indices.len(), metadata.num_nodes());
        Self {
            boxes,
            indices,
            metadata,
        }
    }

    /// Access the metadata describing this RTree
    pub fn metadata(&self) -> &RTreeMetadata {
        &self.metadata
    }

    /// The total number of items contained in this RTree.
    pub fn num_items(&self) -> u32 {
        self.metadata.num_items()
    }

    /// The total number of nodes in this RTree, including both leaf and intermediate nodes.
    pub fn num_nodes(&self) -> usize {
        self.metadata.num_nodes()
    }

    /// The maximum number of elements in each node.
    pub fn node_size(&self) -> u16 {
        self.metadata.node_size()
    }

    /// A slice representing all the bounding boxes of all elements contained within this tree,
    /// including the bounding boxes of each internal node, as `[min_x, min_y, max_x, max_y]`.
    pub fn boxes(&self) -> &[f64] {
        &self.boxes
    }

    /// The number of levels (height) of the tree.
    pub fn num_levels(&self) -> usize {
        self.metadata.level_bounds().len()
    }

    /// The tree is laid out from bottom to top. Level 0 is the _base_ of the tree. Each integer
    /// higher is one level higher of the tree.
    pub fn boxes_at_level(&self, level: usize) -> Result<&[f64]> {
        let level_bounds = self.metadata.level_bounds();
        if level >= level_bounds.len() {
            return Err(GeoKnnError::LevelOutOfBounds(level));
        }
        let result = if level == 0 {
            &self.boxes[0..level_bounds[0]]
        } else {
            &self.boxes[level_bounds[level - 1]..level_bounds[level]]
        };
        Ok(result)
    }

    /// The extent of everything stored in the tree, or `None` when it is empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.root_pos().map(|pos| self.box_at(pos))
    }

    /// Every stored item as its insertion index and box.
    ///
    /// Items come out in tree order, not insertion order.
    pub fn items(&self) -> impl Iterator<Item = (u32, BoundingBox)> + '_ {
        (0..self.num_items() as usize).map(|i| (self.indices[i] as u32, self.box_at(i * 4)))
    }

    /// Search an RTree given the provided bounding box.
    ///
    /// Results are the indexes of the inserted objects in insertion order.
    pub fn search(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<u32> {
        let boxes = &self.boxes;
        let num_items = self.num_items() as usize;
        let node_size = self.node_size() as usize;

        let mut outer_node_index = self.root_pos();

        let mut queue = vec![];
        let mut results = vec![];

        while let Some(node_index) = outer_node_index {
            // a single-item tree has the item itself at the root
            let (start, end) = if node_index < num_items * 4 {
                (node_index, node_index + 4)
            } else {
                let start = self.indices[node_index >> 2];
                let end = (start + node_size * 4)
                    .min(upper_bound(start, self.metadata.level_bounds()));
                (start, end)
            };

            // search through child nodes
            for pos in (start..end).step_by(4) {
                // check if node bbox intersects with query bbox
                if max_x < boxes[pos] {
                    continue; // maxX < nodeMinX
                }
                if max_y < boxes[pos + 1] {
                    continue; // maxY < nodeMinY
                }
                if min_x > boxes[pos + 2] {
                    continue; // minX > nodeMaxX
                }
                if min_y > boxes[pos + 3] {
                    continue; // minY > nodeMaxY
                }

                if pos >= num_items * 4 {
                    queue.push(pos); // node; add it to the search queue
                } else {
                    results.push(self.indices[pos >> 2] as u32); // leaf item
                }
            }

            outer_node_index = queue.pop();
        }

        results
    }

    /// Search an RTree given the provided [`BoundingBox`].
    pub fn search_box(&self, bbox: &BoundingBox) -> Vec<u32> {
        self.search(bbox.min[0], bbox.min[1], bbox.max[0], bbox.max[1])
    }

    /// Search an RTree given the provided rectangle.
    pub fn search_rect(&self, rect: &impl RectTrait<T = f64>) -> Vec<u32> {
        self.search(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// Position of the root box, or `None` for an empty tree.
    pub(crate) fn root_pos(&self) -> Option<usize> {
        self.boxes.len().checked_sub(4)
    }

    #[inline]
    pub(crate) fn box_at(&self, pos: usize) -> BoundingBox {
        let b = &self.boxes[pos..pos + 4];
        BoundingBox::new([b[0], b[1]], [b[2], b[3]])
    }
}
