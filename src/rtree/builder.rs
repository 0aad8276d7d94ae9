use geo_traits::{CoordTrait, RectTrait};

use crate::bbox::BoundingBox;
use crate::error::{GeoKnnError, Result};
use crate::rtree::index::{RTree, RTreeMetadata};
use crate::rtree::sort::{Sort, SortParams};

/// The default node size used by [`RTreeBuilder::new`]
pub const DEFAULT_RTREE_NODE_SIZE: u16 = 16;

/// A builder to create an [`RTree`].
///
/// ```
/// use geo_knn::rtree::{HilbertSort, RTreeBuilder};
///
/// let mut builder = RTreeBuilder::new(3);
/// builder.add(0., 0., 2., 2.);
/// builder.add(1., 1., 3., 3.);
/// builder.add(2., 2., 4., 4.);
/// let tree = builder.finish::<HilbertSort>().unwrap();
/// assert_eq!(tree.num_items(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RTreeBuilder {
    /// Item boxes as `[min_x, min_y, max_x, max_y]`, in insertion order.
    boxes: Vec<f64>,
    num_items: u32,
    node_size: u16,
    /// Running extent of everything added so far.
    bounds: BoundingBox,
}

impl RTreeBuilder {
    /// Create a new builder with the provided number of items and the default node size.
    pub fn new(num_items: u32) -> Self {
        Self::new_with_node_size(num_items, DEFAULT_RTREE_NODE_SIZE)
    }

    /// Create a new builder with the provided number of items and node size.
    ///
    /// A node size below 2 is reported by [`RTreeBuilder::finish`].
    pub fn new_with_node_size(num_items: u32, node_size: u16) -> Self {
        Self {
            boxes: Vec::with_capacity(num_items as usize * 4),
            num_items,
            node_size,
            bounds: BoundingBox::new([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]),
        }
    }

    /// The number of items this builder expects.
    pub fn num_items(&self) -> u32 {
        self.num_items
    }

    /// The maximum number of children of each node.
    pub fn node_size(&self) -> u16 {
        self.node_size
    }

    /// Add a given rectangle to the RTree.
    ///
    /// This returns the insertion index, which provides a lookup back into the original data.
    /// Searches report this same index as the payload of each item.
    #[inline]
    pub fn add(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> u32 {
        let index = (self.boxes.len() / 4) as u32;
        self.boxes.extend_from_slice(&[min_x, min_y, max_x, max_y]);
        self.bounds
            .expand(&BoundingBox::new([min_x, min_y], [max_x, max_y]));
        index
    }

    /// Add a [`BoundingBox`] to the RTree, returning its insertion index.
    #[inline]
    pub fn add_box(&mut self, bbox: &BoundingBox) -> u32 {
        self.add(bbox.min[0], bbox.min[1], bbox.max[0], bbox.max[1])
    }

    /// Add any [`RectTrait`] implementation to the RTree, returning its insertion index.
    #[inline]
    pub fn add_rect(&mut self, rect: &impl RectTrait<T = f64>) -> u32 {
        self.add(
            rect.min().x(),
            rect.min().y(),
            rect.max().x(),
            rect.max().y(),
        )
    }

    /// Consume this builder, performing the sort and generating an RTree ready for queries.
    ///
    /// Fails if the number of added items differs from the number given to the constructor, or
    /// if the node size is below 2.
    pub fn finish<S: Sort>(self) -> Result<RTree> {
        let added = self.boxes.len() / 4;
        if added != self.num_items as usize {
            return Err(GeoKnnError::ItemCount {
                expected: self.num_items,
                added,
            });
        }
        if self.node_size < 2 {
            return Err(GeoKnnError::InvalidNodeSize(self.node_size));
        }

        let metadata = RTreeMetadata::new(self.num_items, self.node_size);
        let num_items = metadata.num_items() as usize;
        let node_size = metadata.node_size() as usize;

        let mut boxes = self.boxes;
        boxes.resize(metadata.num_nodes() * 4, 0.);
        let mut indices: Vec<usize> = (0..num_items).collect();
        indices.resize(metadata.num_nodes(), 0);

        if num_items <= 1 {
            // Zero or one item, we don't even have a root node to fill
            return Ok(RTree::new(boxes, indices, metadata));
        }

        let mut pos = num_items * 4;

        if num_items <= node_size {
            // only one node, skip sorting and just fill the root box
            indices[pos >> 2] = 0;
            boxes[pos..pos + 4].copy_from_slice(&[
                self.bounds.min[0],
                self.bounds.min[1],
                self.bounds.max[0],
                self.bounds.max[1],
            ]);
            return Ok(RTree::new(boxes, indices, metadata));
        }

        let mut sort_params = SortParams {
            num_items,
            node_size,
            bounds: self.bounds,
        };
        S::sort(&mut sort_params, &mut boxes, &mut indices);

        // generate nodes at each tree level, bottom-up
        let level_bounds = metadata.level_bounds();
        let mut child_pos = 0;
        for end in level_bounds[..level_bounds.len() - 1].iter() {
            while child_pos < *end {
                let node_index = child_pos;

                // calculate bbox for the new node
                let mut node_box = box_at(&boxes, child_pos);
                child_pos += 4;
                for _ in 1..node_size {
                    if child_pos >= *end {
                        break;
                    }
                    node_box.expand(&box_at(&boxes, child_pos));
                    child_pos += 4;
                }

                // add the new node to the tree data
                indices[pos >> 2] = node_index;
                boxes[pos..pos + 4].copy_from_slice(&[
                    node_box.min[0],
                    node_box.min[1],
                    node_box.max[0],
                    node_box.max[1],
                ]);
                pos += 4;
            }
        }

        Ok(RTree::new(boxes, indices, metadata))
    }
}

#[inline]
fn box_at(boxes: &[f64], pos: usize) -> BoundingBox {
    BoundingBox::new([boxes[pos], boxes[pos + 1]], [boxes[pos + 2], boxes[pos + 3]])
}

#[cfg(test)]
mod test {
    use crate::rtree::sort::HilbertSort;

    use super::*;

    #[test]
    fn does_not_panic_length_1_tree() {
        let mut builder = RTreeBuilder::new(1);
        builder.add(-20., -20., 1020., 1020.);
        let tree = builder.finish::<HilbertSort>().unwrap();
        let result = tree.search(0., 0., 0., 0.);
        assert_eq!(result, vec![0]);
    }

    #[test]
    fn empty_tree() {
        let tree = RTreeBuilder::new(0).finish::<HilbertSort>().unwrap();
        assert_eq!(tree.num_items(), 0);
        assert_eq!(tree.num_nodes(), 0);
        assert!(tree.bounds().is_none());
        assert!(tree.search(-1., -1., 1., 1.).is_empty());
    }

    #[test]
    fn wrong_item_count() {
        let mut builder = RTreeBuilder::new(3);
        builder.add(0., 0., 1., 1.);
        let err = builder.finish::<HilbertSort>().unwrap_err();
        assert_eq!(
            err,
            GeoKnnError::ItemCount {
                expected: 3,
                added: 1
            }
        );
    }

    #[test]
    fn node_size_too_small() {
        let mut builder = RTreeBuilder::new_with_node_size(2, 1);
        builder.add(0., 0., 1., 1.);
        builder.add(1., 1., 2., 2.);
        assert_eq!(
            builder.finish::<HilbertSort>().unwrap_err(),
            GeoKnnError::InvalidNodeSize(1)
        );
    }

    #[test]
    fn add_rect_and_box() {
        let mut builder = RTreeBuilder::new(2);
        let first = builder.add_rect(&BoundingBox::new([0., 0.], [1., 1.]));
        let second = builder.add_box(&BoundingBox::new([2., 2.], [3., 3.]));
        assert_eq!((first, second), (0, 1));
        let tree = builder.finish::<HilbertSort>().unwrap();
        assert_eq!(
            tree.bounds(),
            Some(BoundingBox::new([0., 0.], [3., 3.]))
        );
    }
}
